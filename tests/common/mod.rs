#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use ndarray::Array2;
use croprec::{FeatureScaler, LabelPredictor, ModelArtifacts, RecommenderError, SoilReadings};

pub const IDENTITY_MINMAX: &str = r#"{"min": [0, 0, 0, 0, 0, 0, 0], "scale": [1, 1, 1, 1, 1, 1, 1]}"#;
pub const IDENTITY_STANDARD: &str = r#"{"mean": [0, 0, 0, 0, 0, 0, 0], "scale": [1, 1, 1, 1, 1, 1, 1]}"#;

pub fn rice_field() -> SoilReadings {
    SoilReadings {
        nitrogen: 90.0,
        phosphorus: 42.0,
        potassium: 43.0,
        temperature: 20.8,
        humidity: 82.0,
        ph: 6.5,
        rainfall: 202.9,
    }
}

/// Always predicts the same label.
#[derive(Debug)]
pub struct FixedLabel(pub i64);

impl LabelPredictor for FixedLabel {
    fn predict(&self, batch: &Array2<f64>) -> Result<Vec<i64>, RecommenderError> {
        Ok(vec![self.0; batch.nrows()])
    }
}

#[derive(Debug)]
pub struct Identity;

impl FeatureScaler for Identity {
    fn transform(&self, batch: &Array2<f64>) -> Result<Array2<f64>, RecommenderError> {
        Ok(batch.clone())
    }
}

/// Records its name in a shared call log and then applies `x * factor + offset`.
#[derive(Debug)]
pub struct Recording {
    pub name: &'static str,
    pub factor: f64,
    pub offset: f64,
    pub calls: Arc<Mutex<Vec<&'static str>>>,
}

impl FeatureScaler for Recording {
    fn transform(&self, batch: &Array2<f64>) -> Result<Array2<f64>, RecommenderError> {
        self.calls.lock().unwrap().push(self.name);
        Ok(batch.mapv(|x| x * self.factor + self.offset))
    }
}

/// Returns the first feature of each row as the label, after rounding.
#[derive(Debug)]
pub struct FirstColumn {
    pub calls: Arc<Mutex<Vec<&'static str>>>,
}

impl LabelPredictor for FirstColumn {
    fn predict(&self, batch: &Array2<f64>) -> Result<Vec<i64>, RecommenderError> {
        self.calls.lock().unwrap().push("classifier");
        Ok(batch.column(0).iter().map(|v| v.round() as i64).collect())
    }
}

pub fn stub_artifacts(label: i64) -> Arc<ModelArtifacts> {
    Arc::new(ModelArtifacts::new(
        Arc::new(FixedLabel(label)),
        Arc::new(Identity),
        Arc::new(Identity),
    ))
}

// Minimal protobuf writer, enough to emit an ONNX ModelProto.

fn varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn field_varint(field: u64, value: u64, out: &mut Vec<u8>) {
    varint(field << 3, out);
    varint(value, out);
}

fn field_bytes(field: u64, bytes: &[u8], out: &mut Vec<u8>) {
    varint((field << 3) | 2, out);
    varint(bytes.len() as u64, out);
    out.extend_from_slice(bytes);
}

const ELEM_FLOAT: u64 = 1;
const ELEM_INT64: u64 = 7;
const ATTR_INT: u64 = 2;

enum Dim {
    Value(u64),
    Param(&'static str),
}

fn value_info(name: &str, elem_type: u64, dims: &[Dim]) -> Vec<u8> {
    let mut shape = Vec::new();
    for dim in dims {
        let mut d = Vec::new();
        match dim {
            Dim::Value(v) => field_varint(1, *v, &mut d),
            Dim::Param(p) => field_bytes(2, p.as_bytes(), &mut d),
        }
        field_bytes(1, &d, &mut shape);
    }

    let mut tensor = Vec::new();
    field_varint(1, elem_type, &mut tensor);
    field_bytes(2, &shape, &mut tensor);

    let mut type_proto = Vec::new();
    field_bytes(1, &tensor, &mut type_proto);

    let mut info = Vec::new();
    field_bytes(1, name.as_bytes(), &mut info);
    field_bytes(2, &type_proto, &mut info);
    info
}

fn int_attribute(name: &str, value: u64) -> Vec<u8> {
    let mut attr = Vec::new();
    field_bytes(1, name.as_bytes(), &mut attr);
    field_varint(3, value, &mut attr);
    field_varint(20, ATTR_INT, &mut attr);
    attr
}

/// An ONNX classifier whose label is the index of the largest feature (0..=6).
///
/// Input `features`: float [N, 7]. Output `label`: int64 [N].
pub fn argmax_model_bytes() -> Vec<u8> {
    let mut node = Vec::new();
    field_bytes(1, b"features", &mut node);
    field_bytes(2, b"label", &mut node);
    field_bytes(3, b"argmax", &mut node);
    field_bytes(4, b"ArgMax", &mut node);
    field_bytes(5, &int_attribute("axis", 1), &mut node);
    field_bytes(5, &int_attribute("keepdims", 0), &mut node);

    let mut graph = Vec::new();
    field_bytes(1, &node, &mut graph);
    field_bytes(2, b"crop_argmax", &mut graph);
    field_bytes(11, &value_info("features", ELEM_FLOAT, &[Dim::Param("N"), Dim::Value(7)]), &mut graph);
    field_bytes(12, &value_info("label", ELEM_INT64, &[Dim::Param("N")]), &mut graph);

    let mut opset = Vec::new();
    field_varint(2, 13, &mut opset);

    let mut model = Vec::new();
    field_varint(1, 8, &mut model);
    field_bytes(2, b"croprec-tests", &mut model);
    field_bytes(7, &graph, &mut model);
    field_bytes(8, &opset, &mut model);
    model
}

/// Writes a complete artifact set: identity scalers plus the argmax classifier.
pub fn write_artifacts(dir: &Path) {
    fs::write(dir.join(croprec::artifacts::MINMAX_SCALER_FILE), IDENTITY_MINMAX).unwrap();
    fs::write(dir.join(croprec::artifacts::STANDARD_SCALER_FILE), IDENTITY_STANDARD).unwrap();
    fs::write(dir.join(croprec::artifacts::MODEL_FILE), argmax_model_bytes()).unwrap();
}
