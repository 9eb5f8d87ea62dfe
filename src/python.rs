use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::Mutex;

use crate::catalog::CatalogFilter;
use crate::core::{Gender, InteractionKind, Perfume, ScentType};
use crate::engine::{EngineConfig, ScentEngine as RustScentEngine, DEFAULT_SEED_TERMS};
use crate::providers::FragellaProvider;
use crate::ranking::{ProfileMatch, SimilarPerfume};
use crate::store::JsonFileStore;

/// Python wrapper for ScentEngine
#[pyclass]
struct ScentEngine {
    engine: Arc<Mutex<RustScentEngine>>,
    runtime: Arc<Runtime>,
}

#[pymethods]
impl ScentEngine {
    /// Create a new engine persisting under `data_dir`. When `api_key` is
    /// given the Fragella provider is registered.
    #[new]
    fn new(data_dir: String, api_key: Option<String>) -> PyResult<Self> {
        let runtime = Arc::new(
            Runtime::new()
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))?,
        );

        let engine = runtime.block_on(async {
            let store = JsonFileStore::new(&data_dir)
                .await
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))?;
            let mut engine = RustScentEngine::new(Arc::new(store), EngineConfig::default())
                .await
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))?;

            if let Some(api_key) = api_key {
                let provider = FragellaProvider::new(api_key).map_err(|e| {
                    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string())
                })?;
                engine.add_provider(Arc::new(provider));
            }

            Ok::<_, PyErr>(engine)
        })?;

        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            runtime,
        })
    }

    /// Search the catalog; filters are optional and conjunctive
    fn search(
        &self,
        query: String,
        genders: Option<Vec<String>>,
        scent_types: Option<Vec<String>>,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> PyResult<PyObject> {
        let filter = build_filter(genders, scent_types, min_price, max_price)?;

        let engine = self.engine.clone();
        let outcome = self.runtime.block_on(async move {
            let mut engine = engine.lock().await;
            engine
                .search(&query, &filter)
                .await
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
        })?;

        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            let perfumes: PyResult<Vec<PyObject>> = outcome
                .perfumes
                .iter()
                .map(|perfume| perfume_to_py(py, perfume))
                .collect();
            dict.set_item("perfumes", perfumes?)?;
            dict.set_item("remote_queried", outcome.remote_queried)?;
            dict.set_item("stale", outcome.stale)?;
            Ok(dict.into())
        })
    }

    /// Record one interaction: "view", "click", "favorite" or
    /// "add_to_inventory"
    fn record_interaction(&self, perfume_id: String, kind: String) -> PyResult<()> {
        let kind: InteractionKind = kind
            .parse()
            .map_err(|e: crate::error::ScentEngineError| {
                PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
            })?;

        let engine = self.engine.clone();
        self.runtime.block_on(async move {
            let mut engine = engine.lock().await;
            engine
                .record_interaction(&perfume_id, kind)
                .await
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
        })
    }

    /// Rank the catalog against five questionnaire answers, each 1-5
    fn submit_questionnaire(&self, answers: Vec<i64>) -> PyResult<Vec<PyObject>> {
        let answers: [i64; 5] = answers.try_into().map_err(|bad: Vec<i64>| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "expected 5 answers, got {}",
                bad.len()
            ))
        })?;

        let engine = self.engine.clone();
        let matches = self.runtime.block_on(async move {
            let engine = engine.lock().await;
            engine
                .submit_questionnaire(answers)
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
        })?;

        Python::with_gil(|py| matches.iter().map(|m| profile_match_to_py(py, m)).collect())
    }

    /// The k catalog entries most similar to the given perfume
    fn similar_to(&self, perfume_id: String, k: Option<usize>) -> PyResult<Vec<PyObject>> {
        let engine = self.engine.clone();
        let similar = self.runtime.block_on(async move {
            let engine = engine.lock().await;
            engine
                .similar_to(&perfume_id, k.unwrap_or(5))
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
        })?;

        Python::with_gil(|py| similar.iter().map(|s| similar_to_py(py, s)).collect())
    }

    /// Add a catalog perfume to the inventory; False when already present
    fn add_to_inventory(&self, perfume_id: String) -> PyResult<bool> {
        let engine = self.engine.clone();
        self.runtime.block_on(async move {
            let mut engine = engine.lock().await;
            engine
                .add_to_inventory(&perfume_id)
                .await
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
        })
    }

    /// Remove a perfume from the inventory; False when it was not there
    fn remove_from_inventory(&self, perfume_id: String) -> PyResult<bool> {
        let engine = self.engine.clone();
        self.runtime.block_on(async move {
            let mut engine = engine.lock().await;
            engine
                .remove_from_inventory(&perfume_id)
                .await
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
        })
    }

    /// Inventory perfumes in insertion order
    fn list_inventory(&self) -> PyResult<Vec<PyObject>> {
        let engine = self.engine.clone();
        let perfumes = self.runtime.block_on(async move {
            let engine = engine.lock().await;
            Ok::<_, PyErr>(engine.list_inventory())
        })?;

        Python::with_gil(|py| perfumes.iter().map(|p| perfume_to_py(py, p)).collect())
    }

    /// Fill the catalog from the default or given seed terms.
    /// Returns the number of perfumes added.
    fn seed_catalog(&self, terms: Option<Vec<String>>, target: Option<usize>) -> PyResult<usize> {
        let engine = self.engine.clone();
        self.runtime.block_on(async move {
            let term_refs: Vec<&str> = match &terms {
                Some(terms) => terms.iter().map(String::as_str).collect(),
                None => DEFAULT_SEED_TERMS.to_vec(),
            };
            let mut engine = engine.lock().await;
            engine
                .seed_catalog(&term_refs, target)
                .await
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
        })
    }

    fn catalog_len(&self) -> PyResult<usize> {
        let engine = self.engine.clone();
        self.runtime.block_on(async move {
            let engine = engine.lock().await;
            Ok(engine.catalog_len())
        })
    }

    /// Derived popularity score for one perfume id
    fn popularity_of(&self, perfume_id: String) -> PyResult<u32> {
        let engine = self.engine.clone();
        self.runtime.block_on(async move {
            let engine = engine.lock().await;
            Ok(engine.popularity_of(&perfume_id))
        })
    }
}

fn build_filter(
    genders: Option<Vec<String>>,
    scent_types: Option<Vec<String>>,
    min_price: Option<f64>,
    max_price: Option<f64>,
) -> PyResult<CatalogFilter> {
    let genders: Vec<Gender> = genders
        .unwrap_or_default()
        .iter()
        .map(|label| {
            label.parse::<Gender>().map_err(|e| {
                PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
            })
        })
        .collect::<PyResult<_>>()?;
    let scent_types: Vec<ScentType> = scent_types
        .unwrap_or_default()
        .iter()
        .map(|label| {
            label.parse::<ScentType>().map_err(|e| {
                PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
            })
        })
        .collect::<PyResult<_>>()?;
    let price = match (min_price, max_price) {
        (None, None) => None,
        (min, max) => Some(min.unwrap_or(0.0)..=max.unwrap_or(f64::MAX)),
    };
    Ok(CatalogFilter {
        query: None,
        genders,
        scent_types,
        price,
    })
}

/// Convert a Perfume to a Python dict
fn perfume_to_py(py: Python, perfume: &Perfume) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    dict.set_item("id", &perfume.id)?;
    dict.set_item("name", &perfume.name)?;
    dict.set_item("brand", &perfume.brand)?;
    dict.set_item("price", perfume.price)?;
    dict.set_item("size", &perfume.size)?;
    dict.set_item("gender", perfume.gender.label())?;
    dict.set_item("scent_type", perfume.scent_type.label())?;
    dict.set_item("description", &perfume.description)?;
    dict.set_item("image_url", &perfume.image_url)?;
    dict.set_item("top_notes", &perfume.top_notes)?;
    dict.set_item("heart_notes", &perfume.heart_notes)?;
    dict.set_item("base_notes", &perfume.base_notes)?;

    let accords: PyResult<Vec<PyObject>> = perfume
        .main_accords
        .iter()
        .map(|accord| {
            let entry = PyDict::new(py);
            entry.set_item("label", &accord.label)?;
            entry.set_item("weight", accord.weight)?;
            Ok(entry.into())
        })
        .collect();
    dict.set_item("main_accords", accords?)?;

    let seasonality = PyDict::new(py);
    seasonality.set_item("Winter", perfume.seasonality.winter)?;
    seasonality.set_item("Spring", perfume.seasonality.spring)?;
    seasonality.set_item("Summer", perfume.seasonality.summer)?;
    seasonality.set_item("Fall", perfume.seasonality.fall)?;
    dict.set_item("seasonality", seasonality)?;

    let occasion = PyDict::new(py);
    occasion.set_item("Day", perfume.occasion.day)?;
    occasion.set_item("Night", perfume.occasion.night)?;
    dict.set_item("occasion", occasion)?;

    Ok(dict.into())
}

/// Convert a ProfileMatch to a Python dict
fn profile_match_to_py(py: Python, matched: &ProfileMatch) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    dict.set_item("perfume", perfume_to_py(py, &matched.perfume)?)?;
    dict.set_item("distance", matched.distance)?;
    dict.set_item("score", matched.score)?;
    Ok(dict.into())
}

/// Convert a SimilarPerfume to a Python dict
fn similar_to_py(py: Python, similar: &SimilarPerfume) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    dict.set_item("perfume", perfume_to_py(py, &similar.perfume)?)?;
    dict.set_item("score", similar.score)?;
    Ok(dict.into())
}

/// Python module
#[pymodule]
fn scentify_engine(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<ScentEngine>()?;
    m.add("__version__", crate::VERSION)?;
    Ok(())
}
