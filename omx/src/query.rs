//! Attribute queries over the matrix namespace

use omx_core::Predicate;

use crate::error::OmxResult;
use crate::matrix::Matrix;
use crate::matrix_store::MatrixStore;
use crate::storage::StorageEngine;

/// Evaluates conjunctive exact-match predicates against matrix attributes
#[derive(Debug, Default, Clone, Copy)]
pub struct AttributeQueryEngine;

impl AttributeQueryEngine {
    /// Every predicate key present on the matrix with an exactly equal value
    pub fn matches(&self, matrix: &Matrix, predicate: &Predicate) -> bool {
        omx_core::matches(matrix.attributes(), predicate)
    }

    /// Names of matching matrices, in listing order
    ///
    /// Only attributes are read; payloads stay in the engine.
    pub fn query_names<E: StorageEngine>(
        &self,
        engine: &E,
        store: &MatrixStore,
        predicate: &Predicate,
    ) -> OmxResult<Vec<String>> {
        let mut names = Vec::new();
        for name in store.list(engine)? {
            if omx_core::matches(&store.attributes(engine, &name)?, predicate) {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Matching matrices, in listing order
    pub fn query_all<E: StorageEngine>(
        &self,
        engine: &E,
        store: &MatrixStore,
        predicate: &Predicate,
    ) -> OmxResult<Vec<Matrix>> {
        self.query_names(engine, store, predicate)?
            .iter()
            .map(|name| store.get(engine, name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::MatrixData;
    use crate::matrix::MatrixOptions;
    use crate::shape_registry::ShapeRegistry;
    use crate::storage::MemoryEngine;
    use omx_core::Scalar;

    fn populated() -> (MemoryEngine, MatrixStore) {
        let mut engine = MemoryEngine::new();
        let mut shapes = ShapeRegistry::new();
        let store = MatrixStore::default();
        let tagged: [(&str, &[(&str, &str)]); 3] = [
            ("m1", &[("timeperiod", "am"), ("mode", "hwy")]),
            ("m2", &[("timeperiod", "md")]),
            ("m3", &[("timeperiod", "am"), ("mode", "trn")]),
        ];
        for (name, attrs) in tagged {
            let options = attrs
                .iter()
                .fold(MatrixOptions::new(), |o, (k, v)| o.with_attribute(*k, *v));
            store
                .create(
                    &mut engine,
                    &mut shapes,
                    name,
                    MatrixData::filled((2, 2), 0.0f32).unwrap(),
                    options,
                )
                .unwrap();
        }
        (engine, store)
    }

    #[test]
    fn test_query_by_single_key() {
        let (engine, store) = populated();
        let predicate = Predicate::new().with("timeperiod", "am");
        let names = AttributeQueryEngine
            .query_names(&engine, &store, &predicate)
            .unwrap();
        assert_eq!(names, vec!["m1", "m3"]);
    }

    #[test]
    fn test_query_is_conjunctive() {
        let (engine, store) = populated();
        let predicate = Predicate::new().with("mode", "hwy").with("timeperiod", "am");
        let found = AttributeQueryEngine
            .query_all(&engine, &store, &predicate)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "m1");
    }

    #[test]
    fn test_empty_and_unmatched_predicates() {
        let (engine, store) = populated();
        let all = AttributeQueryEngine
            .query_names(&engine, &store, &Predicate::new())
            .unwrap();
        assert_eq!(all, vec!["m1", "m2", "m3"]);

        let none = AttributeQueryEngine
            .query_names(&engine, &store, &Predicate::new().with("timeperiod", "pm"))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_values_compare_by_type() {
        let (mut engine, store) = populated();
        store
            .set_attribute(&mut engine, "m2", "year", Scalar::Int(2010))
            .unwrap();
        let matrix = store.get(&engine, "m2").unwrap();

        let query = AttributeQueryEngine;
        assert!(query.matches(&matrix, &Predicate::new().with("year", 2010i64)));
        assert!(!query.matches(&matrix, &Predicate::new().with("year", "2010")));
        assert!(!query.matches(&matrix, &Predicate::new().with("year", 2010.0)));
    }
}
