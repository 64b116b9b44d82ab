//! Builds small index files for tests.

use std::net::Ipv4Addr;

use super::format::*;

/// Writes ranges out in the on-disk layout: super block, header table,
/// data records, then index blocks.
pub(crate) struct IndexBuilder {
    ranges: Vec<(u32, u32, u32, String)>,
    header_interval: usize,
}

impl IndexBuilder {
    pub(crate) fn new() -> Self {
        Self {
            ranges: Vec::new(),
            header_interval: 2,
        }
    }

    /// Emit a header entry every `n` index blocks (the last block always
    /// gets one).
    pub(crate) fn header_interval(mut self, n: usize) -> Self {
        self.header_interval = n.max(1);
        self
    }

    pub(crate) fn add(&mut self, start: &str, end: &str, city_id: u32, region: &str) -> &mut Self {
        let start = u32::from(start.parse::<Ipv4Addr>().unwrap());
        let end = u32::from(end.parse::<Ipv4Addr>().unwrap());
        self.add_range(start, end, city_id, region)
    }

    pub(crate) fn add_range(&mut self, start: u32, end: u32, city_id: u32, region: &str) -> &mut Self {
        assert!(start <= end);
        self.ranges.push((start, end, city_id, region.to_string()));
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut ranges = self.ranges.clone();
        ranges.sort_by_key(|r| r.0);
        assert!(!ranges.is_empty(), "an index needs at least one block");

        let mut buf = vec![0u8; SUPER_BLOCK_LENGTH + TOTAL_HEADER_LENGTH];

        let mut ptrs = Vec::with_capacity(ranges.len());
        for (_, _, city_id, region) in &ranges {
            let length = CITY_ID_LENGTH + region.len();
            let ptr = DataPtr::new(buf.len() as u32, u8::try_from(length).unwrap()).unwrap();
            buf.extend_from_slice(&city_id.to_le_bytes());
            buf.extend_from_slice(region.as_bytes());
            ptrs.push(ptr);
        }

        let first_index_ptr = buf.len() as u32;
        let mut header = Vec::new();
        for (i, ((start, end, _, _), ptr)) in ranges.iter().zip(&ptrs).enumerate() {
            let block_ptr = buf.len() as u32;
            if i % self.header_interval == 0 || i == ranges.len() - 1 {
                header.push((*start, block_ptr));
            }
            buf.extend_from_slice(&start.to_le_bytes());
            buf.extend_from_slice(&end.to_le_bytes());
            buf.extend_from_slice(&ptr.pack().to_le_bytes());
        }
        let last_index_ptr = buf.len() as u32 - INDEX_BLOCK_LENGTH as u32;

        assert!(header.len() <= MAX_HEADER_ENTRIES, "header table overflow");
        for (i, (start, block_ptr)) in header.iter().enumerate() {
            let at = SUPER_BLOCK_LENGTH + i * HEADER_ENTRY_LENGTH;
            buf[at..at + 4].copy_from_slice(&start.to_le_bytes());
            buf[at + 4..at + 8].copy_from_slice(&block_ptr.to_le_bytes());
        }

        buf[0..4].copy_from_slice(&first_index_ptr.to_le_bytes());
        buf[4..8].copy_from_slice(&last_index_ptr.to_le_bytes());
        buf
    }
}
