//! Meta information attached to jobs.

use serde_json::{Map, Value};

/// String-keyed meta information attached to a job.
///
/// Values are arbitrary JSON values, so callers can attach counts, labels
/// or structured context to a measurement. Meta accumulates on a job
/// through [`Counter::start_with_meta`][crate::Counter::start_with_meta]
/// and [`Counter::stop_with_meta`][crate::Counter::stop_with_meta] via a
/// right-biased shallow merge.
///
/// # Examples
///
/// ```
/// use job_timer::Meta;
/// use serde_json::json;
///
/// let mut meta = Meta::new();
/// meta.insert("count".to_string(), json!(42));
///
/// let profile = job_timer::start_with_meta("Total", meta);
/// profile.stop();
/// ```
pub type Meta = Map<String, Value>;

/// Merges `incoming` into `existing` as a right-biased shallow union.
///
/// Keys present in `incoming` overwrite existing values, new keys are
/// added, no keys are removed. The incoming map is consumed, so the stored
/// meta never aliases a caller-held map.
pub(crate) fn merge_meta(existing: &mut Meta, incoming: Meta) {
    for (key, value) in incoming {
        existing.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn meta_of(pairs: &[(&str, Value)]) -> Meta {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn merge_into_empty_adds_all_keys() {
        let mut existing = Meta::new();
        merge_meta(&mut existing, meta_of(&[("a", json!(1)), ("b", json!(2))]));

        assert_eq!(existing, meta_of(&[("a", json!(1)), ("b", json!(2))]));
    }

    #[test]
    fn merge_overwrites_existing_keys() {
        let mut existing = meta_of(&[("a", json!(1)), ("b", json!(1))]);
        merge_meta(&mut existing, meta_of(&[("b", json!(2)), ("c", json!(3))]));

        assert_eq!(
            existing,
            meta_of(&[("a", json!(1)), ("b", json!(2)), ("c", json!(3))])
        );
    }

    #[test]
    fn merge_of_empty_preserves_existing_keys() {
        let mut existing = meta_of(&[("a", json!("kept"))]);
        merge_meta(&mut existing, Meta::new());

        assert_eq!(existing, meta_of(&[("a", json!("kept"))]));
    }

    #[test]
    fn merge_is_shallow() {
        // Nested objects are replaced wholesale, not merged recursively.
        let mut existing = meta_of(&[("nested", json!({"x": 1, "y": 2}))]);
        merge_meta(&mut existing, meta_of(&[("nested", json!({"x": 3}))]));

        assert_eq!(existing, meta_of(&[("nested", json!({"x": 3}))]));
    }
}
