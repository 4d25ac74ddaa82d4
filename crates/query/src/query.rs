//! The `FROM` → `WHERE` → `SELECT` pipeline.
use crate::ast::Query;
use crate::error::QueryError;
use crate::result::ResultSet;
use serde_json::Value;

impl Query {
    /// Runs the query against `root`.
    pub fn evaluate(&self, root: &Value) -> Result<ResultSet, QueryError> {
        log::debug!("Evaluating query: {}", self);

        // An array source is queried element by element.
        let source = self.from.select(root).expand_arrays();
        log::debug!("FROM {} matched {} values", self.from, source.len());

        let filtered = source.filter(&self.filter);
        log::debug!("WHERE {} kept {} values", self.filter, filtered.len());

        let selected = filtered.select(&self.select)?;
        log::debug!("SELECT produced {} values", selected.len());
        Ok(selected)
    }
}

/// Evaluates `query` against `root` and returns the flattened values.
pub fn evaluate(root: &Value, query: &Query) -> Result<Vec<Value>, QueryError> {
    query.evaluate(root).map(ResultSet::into_values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Filter, Selector};
    use crate::parser::parse_query;
    use serde_json::json;

    fn items() -> Value {
        json!({"items": [{"id": 1, "tag": "a"}, {"id": 2, "tag": "b"}]})
    }

    fn run(query: &str, root: &Value) -> Vec<Value> {
        evaluate(root, &parse_query(query).unwrap()).unwrap()
    }

    #[test]
    fn test_select_field_with_where() {
        assert_eq!(
            run("SELECT .tag FROM .items WHERE .id==2", &items()),
            vec![json!("b")]
        );
    }

    #[test]
    fn test_select_several_fields_with_like() {
        assert_eq!(
            run("SELECT .id, .tag FROM .items WHERE .tag like 'a%'", &items()),
            vec![json!({"id": 1, "tag": "a"})]
        );
    }

    #[test]
    fn test_deep_scan_query() {
        assert_eq!(run("SELECT ..tag", &items()), vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_from_array_iterates_its_elements() {
        let root = items();
        assert_eq!(run("SELECT $ FROM .items", &root), run("SELECT $ FROM .items[]", &root));
        assert_eq!(
            run("SELECT .id, .tag FROM .items WHERE .tag == 'a'", &root),
            vec![json!({"id": 1, "tag": "a"})]
        );

        let nested = json!({"rows": [[1, 2], [3]]});
        assert_eq!(run("SELECT $ FROM .rows", &nested), vec![json!([1, 2]), json!([3])]);
        assert_eq!(run("", &json!([1, 2])), vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_empty_query_selects_root() {
        assert_eq!(run("", &items()), vec![items()]);
        assert_eq!(evaluate(&items(), &Query::default()).unwrap(), vec![items()]);
    }

    #[test]
    fn test_from_plural_source() {
        let root = json!({"groups": [{"users": [{"n": "x"}, {"n": "y"}]}, {"users": [{"n": "z"}]}]});
        assert_eq!(
            run("SELECT .n FROM .groups[].users[] WHERE .n != 'y'", &root),
            vec![json!("x"), json!("z")]
        );
    }

    #[test]
    fn test_where_without_matches() {
        assert!(run("SELECT $ FROM .items WHERE .id > 5", &items()).is_empty());
        assert!(run("SELECT .tag FROM .missing", &items()).is_empty());
    }

    #[test]
    fn test_programmatic_query() {
        let query = Query {
            select: vec![Selector::field("id")],
            from: Selector::field("items"),
            filter: Filter::KeyExists(Selector::field("tag")),
        };
        assert_eq!(evaluate(&items(), &query).unwrap(), vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_merge_error_surfaces() {
        let err = parse_query("SELECT $, .items[] FROM $")
            .unwrap()
            .evaluate(&items())
            .unwrap_err();
        assert!(matches!(err, QueryError::Merge(_)));
    }
}
