use crate::driver::Frame;
use rotary::{ComponentId, Placement};
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write frame: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Consumes the placements of each rendered frame.
pub trait FrameSink {
    fn present(&mut self, frame: &Frame) -> Result<(), SinkError>;
}

impl FrameSink for Vec<Frame> {
    fn present(&mut self, frame: &Frame) -> Result<(), SinkError> {
        self.push(frame.clone());
        Ok(())
    }
}

/// The flat record a renderer needs for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementRecord {
    pub id: ComponentId<usize>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<&Placement<usize>> for PlacementRecord {
    fn from(placement: &Placement<usize>) -> Self {
        Self {
            id: placement.id,
            x: placement.center.x,
            y: placement.center.y,
            width: placement.size.width,
            height: placement.size.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub expansion_level: f64,
    pub width: f64,
    pub height: f64,
    pub placements: Vec<PlacementRecord>,
}

impl From<&Frame> for FrameRecord {
    fn from(frame: &Frame) -> Self {
        Self {
            frame: frame.number,
            expansion_level: frame.layout.expansion_level,
            width: frame.bounds.size.width,
            height: frame.bounds.size.height,
            placements: frame.placements.iter().map(PlacementRecord::from).collect(),
        }
    }
}

/// Writes one JSON object per frame, newline separated.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn present(&mut self, frame: &Frame) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &FrameRecord::from(frame))?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogSink;

impl FrameSink for LogSink {
    fn present(&mut self, frame: &Frame) -> Result<(), SinkError> {
        log::debug!(
            "frame {}: level {:.3}, {} placements",
            frame.number,
            frame.layout.expansion_level,
            frame.placements.len()
        );
        for placement in &frame.placements {
            log::trace!(
                "  {:?} at ({:.1}, {:.1}) size {:.1}",
                placement.id,
                placement.center.x,
                placement.center.y,
                placement.size.width
            );
        }
        Ok(())
    }
}
