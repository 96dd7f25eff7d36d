/// Walks `history` once per anchor, in anchor order, collecting every entry
/// equal to the anchor. No inference: unmatched anchors contribute nothing.
#[must_use]
pub fn traverse<T: PartialEq + Clone>(anchors: &[T], history: &[T]) -> Vec<T> {
    anchors
        .iter()
        .flat_map(|anchor| history.iter().filter(move |entry| *entry == anchor))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_matches_per_anchor_in_order() {
        let history = ["wake", "feed", "play", "feed", "sleep"];
        assert_eq!(
            traverse(&["feed", "wake", "bath"], &history),
            vec!["feed", "feed", "wake"]
        );
        assert!(traverse::<&str>(&[], &history).is_empty());
    }
}
