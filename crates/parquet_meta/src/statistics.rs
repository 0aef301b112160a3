use crate::thrift_gen;

/// Min/max and count statistics for a column chunk or page.
///
/// Values are kept as the raw plain-encoded bytes from the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub min: Option<Vec<u8>>,
    pub max: Option<Vec<u8>>,
    pub null_count: Option<i64>,
    pub distinct_count: Option<i64>,
    /// Min and max were read from the deprecated `min`/`max` fields.
    ///
    /// Older writers filled those using signed byte comparison regardless of
    /// the column's sort order, so they can't be treated as `min_value` and
    /// `max_value`.
    pub deprecated_min_max: bool,
}

impl Statistics {
    /// Convert from wire statistics.
    ///
    /// Min and max always come from the same pair of fields. The
    /// `min_value`/`max_value` pair is used when both are set, the deprecated
    /// pair when either of its fields is set.
    pub fn from_thrift(stats: thrift_gen::Statistics) -> Self {
        let use_new = stats.min_value.is_some() && stats.max_value.is_some();
        let use_deprecated = !use_new && (stats.min.is_some() || stats.max.is_some());

        let (min, max) = if use_deprecated {
            (stats.min, stats.max)
        } else {
            (stats.min_value, stats.max_value)
        };

        Statistics {
            min,
            max,
            null_count: stats.null_count,
            distinct_count: stats.distinct_count,
            deprecated_min_max: use_deprecated,
        }
    }

    /// Written back to the same pair of fields it was read from.
    pub fn to_thrift(&self) -> thrift_gen::Statistics {
        let mut stats = thrift_gen::Statistics {
            null_count: self.null_count,
            distinct_count: self.distinct_count,
            ..Default::default()
        };
        if self.deprecated_min_max {
            stats.min = self.min.clone();
            stats.max = self.max.clone();
        } else {
            stats.min_value = self.min.clone();
            stats.max_value = self.max.clone();
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pair_when_complete() {
        let wire = thrift_gen::Statistics {
            max: Some(vec![9]),
            min: Some(vec![0]),
            null_count: Some(3),
            distinct_count: None,
            max_value: Some(vec![8]),
            min_value: Some(vec![1]),
        };
        let stats = Statistics::from_thrift(wire);

        let expected = Statistics {
            min: Some(vec![1]),
            max: Some(vec![8]),
            null_count: Some(3),
            distinct_count: None,
            deprecated_min_max: false,
        };
        assert_eq!(expected, stats);
    }

    #[test]
    fn pairs_are_never_mixed() {
        let stats = Statistics::from_thrift(thrift_gen::Statistics {
            max: Some(vec![9]),
            min: Some(vec![0]),
            max_value: Some(vec![8]),
            min_value: None,
            ..Default::default()
        });

        assert_eq!(Some(vec![0]), stats.min);
        assert_eq!(Some(vec![9]), stats.max);
        assert!(stats.deprecated_min_max);
    }

    #[test]
    fn deprecated_only_written_back_unchanged() {
        let wire = thrift_gen::Statistics {
            min: Some(vec![0]),
            max: Some(vec![9]),
            null_count: Some(1),
            ..Default::default()
        };

        let stats = Statistics::from_thrift(wire.clone());
        assert!(stats.deprecated_min_max);
        assert_eq!(wire, stats.to_thrift());
    }

    #[test]
    fn new_only_written_back_unchanged() {
        let wire = thrift_gen::Statistics {
            min_value: Some(vec![2]),
            max_value: Some(vec![7]),
            distinct_count: Some(5),
            ..Default::default()
        };

        let stats = Statistics::from_thrift(wire.clone());
        assert!(!stats.deprecated_min_max);
        assert_eq!(wire, stats.to_thrift());
    }
}
