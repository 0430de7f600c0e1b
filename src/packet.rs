//! Read-only view over a single packet buffer plus the side-channel
//! fields a packet tap hands the classifier alongside the bytes
//! themselves (total wire length, hardware-stripped VLAN tag).
//!
//! All loads are bounds-checked and return `0` on out-of-bounds access
//! instead of panicking or erroring, per spec §7: a malformed or short
//! packet degrades to zeroed hashes at whichever layer ran out of
//! bytes, it never aborts classification.

use nom::number::complete::{be_u16, be_u32};

/// A single packet as handed to the classifier by the tap.
#[derive(Debug, Clone, Copy)]
pub struct PacketView<'a> {
    data: &'a [u8],
    /// Total wire length of the packet (may exceed `data.len()` if the
    /// tap truncated the capture; used for byte-count metrics).
    pub total_len: u32,
    /// `Some(tci)` if the tap stripped a hardware-offloaded VLAN tag
    /// before handing the packet over, carrying that tag's raw TCI.
    pub vlan_offloaded: Option<u16>,
}

impl<'a> PacketView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            total_len: data.len() as u32,
            vlan_offloaded: None,
        }
    }

    pub fn with_total_len(mut self, total_len: u32) -> Self {
        self.total_len = total_len;
        self
    }

    pub fn with_vlan_offloaded(mut self, tci: u16) -> Self {
        self.vlan_offloaded = Some(tci);
        self
    }

    #[inline]
    pub fn read_u8(&self, offset: usize) -> u8 {
        self.data.get(offset).copied().unwrap_or(0)
    }

    #[inline]
    pub fn read_u16(&self, offset: usize) -> u16 {
        self.data
            .get(offset..offset + 2)
            .and_then(|s| be_u16::<_, nom::error::Error<&[u8]>>(s).ok())
            .map(|(_, v)| v)
            .unwrap_or(0)
    }

    #[inline]
    pub fn read_u32(&self, offset: usize) -> u32 {
        self.data
            .get(offset..offset + 4)
            .and_then(|s| be_u32::<_, nom::error::Error<&[u8]>>(s).ok())
            .map(|(_, v)| v)
            .unwrap_or(0)
    }

    /// Reads a 6-byte MAC address, zero-padded if short.
    #[inline]
    pub fn read_mac(&self, offset: usize) -> [u8; 6] {
        let mut mac = [0u8; 6];
        if let Some(slice) = self.data.get(offset..offset + 6) {
            mac.copy_from_slice(slice);
        }
        mac
    }

    /// Reads a fixed-size byte array, zero-padded if short.
    #[inline]
    pub fn read_array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        if let Some(slice) = self.data.get(offset..offset + N) {
            out.copy_from_slice(slice);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
