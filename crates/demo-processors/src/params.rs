// SPDX-License-Identifier: MIT

//! Small helpers for pulling typed values out of a processor descriptor's
//! free-form `parameters` map.

use crate::error::DemoProcessorError;
use std::collections::HashMap;

pub fn require_str<'a>(params: &'a HashMap<String, serde_json::Value>, name: &'static str) -> Result<&'a str, DemoProcessorError> {
    params
        .get(name)
        .ok_or(DemoProcessorError::MissingParameter(name))?
        .as_str()
        .ok_or(DemoProcessorError::WrongParameterType { name, expected: "string" })
}

pub fn bool_or(params: &HashMap<String, serde_json::Value>, name: &'static str, default: bool) -> Result<bool, DemoProcessorError> {
    match params.get(name) {
        None => Ok(default),
        Some(value) => value.as_bool().ok_or(DemoProcessorError::WrongParameterType { name, expected: "bool" }),
    }
}
