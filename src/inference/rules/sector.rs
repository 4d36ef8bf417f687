//! Same non-null sector on two distinct assets.
use super::{link, same_label};
use crate::config::InferenceConfig;
use crate::model::{Asset, ModelError, Relationship, RelationshipType};

pub(crate) fn infer(
    a: &Asset,
    b: &Asset,
    config: &InferenceConfig,
    out: &mut Vec<Relationship>,
) -> Result<(), ModelError> {
    if let (Some(sa), Some(sb)) = (a.sector(), b.sector()) {
        if same_label(sa, sb) {
            out.push(link(a, b, RelationshipType::SameSector, config.same_sector_strength)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::equity;
    use rstest::rstest;

    #[rstest]
    #[case("Tech", "tech", true)]
    #[case("Énergie", "énergie", true)]
    #[case("ÉNERGIE", "énergie", true)]
    #[case("Energie", "Énergie", false)]
    #[case("Tech", "Finance", false)]
    fn test_sector_match_folds_case(#[case] a: &str, #[case] b: &str, #[case] linked: bool) {
        let mut out = Vec::new();
        infer(&equity("A", Some(a)), &equity("B", Some(b)), &InferenceConfig::default(), &mut out).unwrap();
        assert_eq!(out.len(), usize::from(linked));
    }
}
