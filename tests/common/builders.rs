//! Test data builders for creating test objects

use sigedit_rs::editor::{Editor, EditorConfig};
use sigedit_rs::types::ChannelTable;
use std::time::Duration;

/// Builder for channel tables sampled at a fixed time step
pub struct TableBuilder {
    start: f64,
    step: f64,
    primary: Vec<f64>,
    reference: Option<Vec<f64>>,
}

impl TableBuilder {
    pub fn new(primary: &[f64]) -> Self {
        Self {
            start: 0.0,
            step: 1.0,
            primary: primary.to_vec(),
            reference: None,
        }
    }

    /// Sine wave with `cycles` full periods over `len` samples
    pub fn sine(len: usize, cycles: f64) -> Self {
        let primary = (0..len)
            .map(|i| (i as f64 / len as f64 * cycles * std::f64::consts::TAU).sin() * 50.0 + 50.0)
            .collect::<Vec<_>>();
        Self::new(&primary)
    }

    pub fn start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn reference(mut self, reference: &[f64]) -> Self {
        self.reference = Some(reference.to_vec());
        self
    }

    pub fn build(self) -> ChannelTable {
        let len = self.primary.len();
        let time = (0..len).map(|i| self.start + i as f64 * self.step).collect();
        let reference = self.reference.unwrap_or_else(|| vec![0.0; len]);
        ChannelTable::from_channels(time, self.primary, reference)
    }
}

/// Builder for editors loaded with a table
pub struct EditorBuilder {
    config: EditorConfig,
    table: Option<ChannelTable>,
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
            table: None,
        }
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.config.debounce = debounce;
        self
    }

    pub fn table(mut self, table: ChannelTable) -> Self {
        self.table = Some(table);
        self
    }

    pub fn build(self) -> Editor {
        let mut editor = Editor::new(self.config);
        if let Some(table) = self.table {
            editor.load(table).expect("test table should load");
        }
        editor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builder() {
        let table = TableBuilder::new(&[1.0, 2.0, 3.0]).start(10.0).step(0.5).build();

        assert_eq!(table.get("time axis"), Some(&[10.0, 10.5, 11.0][..]));
        assert_eq!(table.get("reference signal"), Some(&[0.0, 0.0, 0.0][..]));
    }
}
