//! WASM bindings for thmenv
//!
//! Exposes the JSON filter to JavaScript hosts.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::{filter_json, FilterOptions, OutputFormat};

/// Filter result returned to JavaScript
#[derive(Serialize, Deserialize)]
pub struct FilterJsonResult {
    /// The rewritten Pandoc JSON
    pub output: String,
    /// Whether filtering succeeded
    pub success: bool,
    /// Error message if filtering failed
    pub error: Option<String>,
}

/// Safely serialize a value to JsValue, returning an error object on failure.
fn to_js_value<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        let error_obj = FilterJsonResult {
            output: String::new(),
            success: false,
            error: Some(format!("Serialization error: {}", e)),
        };
        serde_wasm_bindgen::to_value(&error_obj).unwrap_or(JsValue::NULL)
    })
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Apply the theorem filter to a Pandoc JSON document.
///
/// # Arguments
/// * `input` - Pandoc JSON (`pandoc -t json`)
/// * `format` - Target writer name, e.g. `latex` or `html5`
#[wasm_bindgen(js_name = "filterJson")]
pub fn filter_json_wasm(input: &str, format: &str) -> JsValue {
    let result = match filter_json(
        input,
        OutputFormat::from_writer(format),
        &FilterOptions::default(),
    ) {
        Ok(output) => FilterJsonResult {
            output,
            success: true,
            error: None,
        },
        Err(e) => FilterJsonResult {
            output: String::new(),
            success: false,
            error: Some(e.to_string()),
        },
    };
    to_js_value(&result)
}
