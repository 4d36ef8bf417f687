//! Regulatory co-impact: assets named together by one event.
use crate::config::InferenceConfig;
use crate::model::{ModelError, RegulatoryEvent, Relationship, RelationshipType, Strength};

pub(crate) fn infer(
    event: &RegulatoryEvent,
    config: &InferenceConfig,
    out: &mut Vec<Relationship>,
) -> Result<(), ModelError> {
    let ids = event.distinct_asset_ids();
    if ids.len() < 2 {
        return Ok(());
    }
    let strength = Strength::clamped(event.impact().magnitude() * config.regulatory_impact_scale)?;
    let kind = RelationshipType::RegulatoryCoimpact;

    for (i, &source) in ids.iter().enumerate() {
        for &target in &ids[i + 1..] {
            out.push(Relationship::with_direction(
                source.clone(),
                target.clone(),
                kind,
                strength,
                kind.is_bidirectional(),
            )?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetId, ImpactScore};
    use chrono::NaiveDate;

    fn event(ids: &[&str], impact: f64) -> RegulatoryEvent {
        RegulatoryEvent::new(
            "EV",
            ids.iter().map(|s| AssetId::new(*s).unwrap()),
            "RULE",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "",
            ImpactScore::new(impact).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_every_distinct_pair_is_linked() {
        let mut out = Vec::new();
        infer(&event(&["A", "B", "A", "C"], -0.4), &InferenceConfig::default(), &mut out).unwrap();
        let pairs: Vec<(&str, &str)> = out.iter().map(|r| (r.source().as_str(), r.target().as_str())).collect();
        assert_eq!(pairs, vec![("A", "B"), ("A", "C"), ("B", "C")]);
        assert!(out.iter().all(|r| r.strength() == 0.4 && r.is_bidirectional()));
    }

    #[test]
    fn test_scale_is_clamped_and_single_asset_events_are_silent() {
        let config = InferenceConfig { regulatory_impact_scale: 3.0, ..Default::default() };
        let mut out = Vec::new();
        infer(&event(&["A", "B"], 0.5), &config, &mut out).unwrap();
        assert_eq!(out[0].strength(), 1.0);

        out.clear();
        infer(&event(&["A", "A"], 0.5), &config, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
