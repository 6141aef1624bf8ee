use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

/// One node of an ffmpeg complex filter graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterNode {
    pub filter: &'static str,
    pub options: &'static [(&'static str, u32)],
    pub inputs: &'static [&'static str],
    pub outputs: &'static [&'static str],
}

/// A filter graph plus the single output it renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterGraphSpec {
    pub nodes: &'static [FilterNode],
    pub output: &'static str,
}

struct Options(&'static [(&'static str, u32)]);

impl Serialize for Options {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for FilterNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.outputs.is_empty() { 3 } else { 4 };
        let mut node = serializer.serialize_struct("FilterNode", len)?;
        node.serialize_field("filter", self.filter)?;
        node.serialize_field("options", &Options(self.options))?;
        node.serialize_field("inputs", self.inputs)?;
        // The last node feeds the output file, so it has no named pad.
        if !self.outputs.is_empty() {
            node.serialize_field("outputs", self.outputs)?;
        }
        node.end()
    }
}
