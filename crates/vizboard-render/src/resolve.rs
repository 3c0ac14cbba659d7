//! Maps configured field names onto per-record values.

use vizboard_core::{Dimensions, Record, Scalar};

/// One role's values across a record slice, aligned by record index.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDimension {
    pub field: String,
    pub values: Vec<Option<Scalar>>,
}

impl ResolvedDimension {
    pub fn resolve(field: &str, records: &[Record]) -> Self {
        Self {
            field: field.to_string(),
            values: records.iter().map(|r| r.get(field).cloned()).collect(),
        }
    }

    /// An unbound role: `len` absent values under an empty field name.
    pub fn absent(len: usize) -> Self {
        Self {
            field: String::new(),
            values: vec![None; len],
        }
    }

    /// Value for the record at `index`, `None` when absent or out of range.
    pub fn value(&self, index: usize) -> Option<&Scalar> {
        self.values.get(index).and_then(Option::as_ref)
    }

    pub fn number(&self, index: usize) -> Option<f64> {
        self.value(index).and_then(Scalar::as_f64)
    }

    /// Display text for the record at `index`, empty when absent.
    pub fn display(&self, index: usize) -> String {
        self.value(index).map(Scalar::display).unwrap_or_default()
    }

    pub fn present(&self) -> impl Iterator<Item = &Scalar> {
        self.values.iter().flatten()
    }

    /// Unique present values in first-seen order.
    pub fn distinct(&self) -> Vec<Scalar> {
        crate::scale::distinct(self.present())
    }

    /// `(min, max)` over values that coerce to numbers, or `None` when none do.
    pub fn numeric_extent(&self) -> Option<(f64, f64)> {
        let mut nums = self.present().filter_map(Scalar::as_f64).peekable();
        nums.peek()?;
        Some(crate::scale::LinearScale::extent(nums))
    }
}

/// All bound roles for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDimensions {
    pub x: ResolvedDimension,
    /// All-absent when no `y` field is bound.
    pub y: ResolvedDimension,
    pub size: Option<ResolvedDimension>,
    pub color: Option<ResolvedDimension>,
    pub group: Option<ResolvedDimension>,
}

impl ResolvedDimensions {
    pub fn resolve(dims: &Dimensions, records: &[Record]) -> Self {
        let role = |field: Option<&str>| field.map(|f| ResolvedDimension::resolve(f, records));
        Self {
            x: ResolvedDimension::resolve(&dims.x, records),
            y: role(dims.y()).unwrap_or_else(|| ResolvedDimension::absent(records.len())),
            size: role(dims.size()),
            color: role(dims.color()),
            group: role(dims.group()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record::new().with("k", "a").with("v", 3.0),
            Record::new().with("k", "b"),
            Record::new().with("k", "a").with("v", "7"),
            Record::new().with("v", -1.0),
        ]
    }

    #[test]
    fn missing_fields_resolve_to_absent() {
        let recs = records();
        let v = ResolvedDimension::resolve("v", &recs);
        assert_eq!(v.number(0), Some(3.0));
        assert_eq!(v.value(1), None);
        assert_eq!(v.number(2), Some(7.0));
        assert_eq!(v.value(99), None);
        assert_eq!(v.display(1), "");
    }

    #[test]
    fn distinct_and_extent() {
        let recs = records();
        let k = ResolvedDimension::resolve("k", &recs);
        assert_eq!(k.distinct(), vec![Scalar::from("a"), Scalar::from("b")]);
        assert_eq!(k.numeric_extent(), None);
        let v = ResolvedDimension::resolve("v", &recs);
        assert_eq!(v.numeric_extent(), Some((-1.0, 7.0)));
    }

    #[test]
    fn resolves_only_bound_roles() {
        let recs = records();
        let dims = Dimensions::new("k").with_y("v").with_color("");
        let resolved = ResolvedDimensions::resolve(&dims, &recs);
        assert_eq!(resolved.x.values.len(), 4);
        assert_eq!(resolved.y.field, "v");
        assert!(resolved.color.is_none());
        assert!(resolved.group.is_none());

        let unbound = ResolvedDimensions::resolve(&Dimensions::new("k"), &recs);
        assert_eq!(unbound.y, ResolvedDimension::absent(4));
        assert_eq!(unbound.y.numeric_extent(), None);
    }
}
