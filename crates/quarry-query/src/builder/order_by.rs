//! Order-by bookkeeping shared by all builders.

use crate::condition::{Condition, GraphPattern, PatternElement};
use crate::sort::{SortKeyTable, MAIN_SUBJECT};
use crate::value::{ValueType, Variable};

/// Sort key a join variable's values contribute to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByProperty {
    pub key: String,
    pub value_type: ValueType,
}

impl OrderByProperty {
    pub fn new(key: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            key: key.into(),
            value_type,
        }
    }

    /// The result entities themselves, which are always pages.
    pub fn main_subject() -> Self {
        Self::new(MAIN_SUBJECT, ValueType::Page)
    }
}

/// Record the variable carrying `order_by`'s sort value on `condition`.
///
/// Nothing is recorded unless the key was requested, the condition can match
/// at all, and no variable is recorded for the key yet. Pages sort by their
/// sort key, bound to `<join><suffix>` through a weak condition; inline
/// values sort by the join variable itself.
pub(crate) fn attach_order_by(
    condition: &mut Condition,
    join_variable: &Variable,
    order_by: Option<&OrderByProperty>,
    value_type: ValueType,
    sort_keys: &SortKeyTable,
    sort_key_suffix: &str,
) {
    let Some(order_by) = order_by else {
        return;
    };
    if condition.is_false()
        || !sort_keys.contains(&order_by.key)
        || condition.side.order_variables.contains_key(&order_by.key)
    {
        return;
    }

    let sort_variable = if value_type.is_resource() {
        let sort_variable = join_variable.with_suffix(sort_key_suffix);
        condition.side.weak.push(Condition::where_pattern(GraphPattern::from(
            PatternElement::SortKey {
                subject: join_variable.clone(),
                sort_variable: sort_variable.clone(),
            },
        )));
        sort_variable
    } else {
        join_variable.clone()
    };

    condition
        .side
        .order_variables
        .insert(order_by.key.clone(), sort_variable);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{RequestedSort, SortDirection};

    fn table(keys: &[&str]) -> SortKeyTable {
        let requested: Vec<_> = keys
            .iter()
            .map(|key| RequestedSort::new(*key, SortDirection::Asc))
            .collect();
        SortKeyTable::from_requested(&requested)
    }

    #[test]
    fn test_unrequested_key_is_ignored() {
        let mut condition = Condition::unconstrained();
        attach_order_by(
            &mut condition,
            &Variable::new("v1"),
            Some(&OrderByProperty::new("Age", ValueType::Number)),
            ValueType::Number,
            &table(&["Name"]),
            "sk",
        );
        assert!(condition.order_variables().is_empty());
        assert!(condition.weak().is_empty());
    }

    #[test]
    fn test_inline_value_sorts_on_join_variable() {
        let mut condition = Condition::unconstrained();
        attach_order_by(
            &mut condition,
            &Variable::new("v1"),
            Some(&OrderByProperty::new("Age", ValueType::Number)),
            ValueType::Number,
            &table(&["Age"]),
            "sk",
        );
        assert_eq!(condition.order_variables()["Age"], Variable::new("v1"));
        assert!(condition.weak().is_empty());
    }

    #[test]
    fn test_page_sorts_on_weak_sort_key() {
        let mut condition = Condition::unconstrained();
        attach_order_by(
            &mut condition,
            &Variable::new("result"),
            Some(&OrderByProperty::main_subject()),
            ValueType::Page,
            &table(&[MAIN_SUBJECT]),
            "sk",
        );
        assert_eq!(
            condition.order_variables()[MAIN_SUBJECT],
            Variable::new("resultsk")
        );
        assert_eq!(condition.weak().len(), 1);
        assert_eq!(
            condition.weak()[0].to_string(),
            "WHERE { ?result swivt:wikiPageSortKey ?resultsk . }"
        );
    }

    #[test]
    fn test_false_gets_no_order_data() {
        let mut condition = Condition::unsatisfiable();
        attach_order_by(
            &mut condition,
            &Variable::new("v1"),
            Some(&OrderByProperty::new("Age", ValueType::Number)),
            ValueType::Number,
            &table(&["Age"]),
            "sk",
        );
        assert!(condition.order_variables().is_empty());
    }

    #[test]
    fn test_existing_entry_is_kept() {
        let mut condition = Condition::unconstrained();
        let order_by = OrderByProperty::new("Friend", ValueType::Page);
        for join in ["v1", "v2"] {
            attach_order_by(
                &mut condition,
                &Variable::new(join),
                Some(&order_by),
                ValueType::Page,
                &table(&["Friend"]),
                "sk",
            );
        }
        assert_eq!(condition.order_variables()["Friend"], Variable::new("v1sk"));
        assert_eq!(condition.weak().len(), 1);
    }
}
