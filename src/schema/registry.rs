//! Layouts for every packet of a structure document

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::{ChannelCatalog, CompiledLayout};
use crate::documents::{StructureDocument, Versions};
use crate::{Result, TelemetryError};

/// Compiled layouts of one packet structure, keyed by packet id.
///
/// Every packet is compiled once when the registry is built. Packets that list the
/// same channels share one `Arc<CompiledLayout>`.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    structure_id: String,
    versions: Versions,
    packets: Vec<(String, Arc<CompiledLayout>)>,
}

impl LayoutRegistry {
    /// Compile all packet definitions; the first failing packet aborts the build.
    pub fn compile(structure: &StructureDocument, catalog: &ChannelCatalog) -> Result<Self> {
        let mut by_channels: HashMap<&[String], Arc<CompiledLayout>> = HashMap::new();
        let mut packets = Vec::with_capacity(structure.packets.len());

        for packet in &structure.packets {
            let layout = match by_channels.get(packet.channels.as_slice()) {
                Some(layout) => Arc::clone(layout),
                None => {
                    let layout = Arc::new(CompiledLayout::build(&packet.channels, catalog)?);
                    by_channels.insert(packet.channels.as_slice(), Arc::clone(&layout));
                    layout
                }
            };

            debug!(
                packet = %packet.id,
                fields = layout.len(),
                total_size = layout.total_size(),
                "Packet layout ready"
            );
            packets.push((packet.id.clone(), layout));
        }

        info!(
            structure = %structure.id,
            packets = packets.len(),
            distinct_layouts = by_channels.len(),
            "Packet structure compiled"
        );

        Ok(Self { structure_id: structure.id.clone(), versions: structure.versions, packets })
    }

    /// Layout of a packet, if defined.
    pub fn get(&self, packet: &str) -> Option<Arc<CompiledLayout>> {
        self.packets.iter().find(|(id, _)| id == packet).map(|(_, layout)| Arc::clone(layout))
    }

    /// Layout of a packet, failing with `PacketNotFound` when undefined.
    pub fn require(&self, packet: &str) -> Result<Arc<CompiledLayout>> {
        self.get(packet).ok_or_else(|| TelemetryError::PacketNotFound { packet: packet.to_string() })
    }

    /// Layout of the first packet in document order.
    pub fn first(&self) -> Option<(&str, Arc<CompiledLayout>)> {
        self.packets.first().map(|(id, layout)| (id.as_str(), Arc::clone(layout)))
    }

    /// Packet ids in document order.
    pub fn packet_ids(&self) -> impl Iterator<Item = &str> {
        self.packets.iter().map(|(id, _)| id.as_str())
    }

    pub fn structure_id(&self) -> &str {
        &self.structure_id
    }

    pub fn versions(&self) -> Versions {
        self.versions
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }
}
