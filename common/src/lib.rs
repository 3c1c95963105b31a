//! Ohm Reader Common Library
//!
//! 色環検出から抵抗値を読み取るエンジン。CLIと他の呼び出し側で共有される。
//!
//! 処理の流れ: Filter → Orient → Order → Decode

pub mod color;
pub mod decoder;
pub mod error;
pub mod export;
pub mod filter;
pub mod ordering;
pub mod orientation;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod types;

pub use color::{ClassMap, ColorLabel};
pub use decoder::{
    decode, decode_with_correction, format_ohms, is_tolerance_only, BandMode, BandRole, Decoded,
    ResistanceResult,
};
pub use error::{Error, Result, Stage, Warning};
pub use filter::{filter_detections, DropReason, DroppedDetection, FilterOutcome, GapStats};
pub use ordering::{order_sequence, OrderingOutcome};
pub use orientation::resolve_axis;
pub use parser::{parse_detection_json, parse_yolo_labels, ComponentInfo, DetectionFile};
pub use pipeline::{read_resistor, resolve, BandReading, Resolution};
pub use record::{records_to_csv, ComponentRecord, RECORD_HEADERS};
pub use types::{Axis, BoundingBox, Detection, EngineConfig, OrderedSequence, Point};
