//! Shared helpers for integration tests.

use std::path::{Path, PathBuf};

const HEADER_END: usize = 8 + 8192;

/// Write `ranges` (start, end, city id, region) as an index file, with a
/// header entry every `interval` blocks plus one for the last block.
pub fn build_index(ranges: &[(u32, u32, u32, &str)], interval: usize) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_END];

    let mut ptrs = Vec::new();
    for (_, _, city_id, region) in ranges {
        let length = (4 + region.len()) as u32;
        ptrs.push((length << 24) | buf.len() as u32);
        buf.extend_from_slice(&city_id.to_le_bytes());
        buf.extend_from_slice(region.as_bytes());
    }

    let first = buf.len() as u32;
    let mut entry = 0;
    for (i, ((start, end, _, _), ptr)) in ranges.iter().zip(&ptrs).enumerate() {
        if i % interval == 0 || i == ranges.len() - 1 {
            let at = 8 + entry * 8;
            buf[at..at + 4].copy_from_slice(&start.to_le_bytes());
            let block_ptr = buf.len() as u32;
            buf[at + 4..at + 8].copy_from_slice(&block_ptr.to_le_bytes());
            entry += 1;
        }
        buf.extend_from_slice(&start.to_le_bytes());
        buf.extend_from_slice(&end.to_le_bytes());
        buf.extend_from_slice(&ptr.to_le_bytes());
    }
    let last = buf.len() as u32 - 12;

    buf[0..4].copy_from_slice(&first.to_le_bytes());
    buf[4..8].copy_from_slice(&last.to_le_bytes());
    buf
}

/// A few well-known ranges with gaps between them.
pub fn sample_ranges() -> Vec<(u32, u32, u32, &'static str)> {
    vec![
        (0x0100_0000, 0x0100_00FF, 42, "CN|0|Beijing|Beijing|China Telecom"),
        (0x0100_0100, 0x0100_03FF, 43, "CN|0|Fujian|Fuzhou|China Telecom"),
        (0x0808_0800, 0x0808_08FF, 7, "US|0|California|Mountain View|Google"),
        (0x7272_7200, 0x7272_72FF, 50, "CN|0|Jiangsu|Nanjing|China Telecom"),
        (0xDF05_0500, 0xDF05_05FF, 51, "CN|0|Zhejiang|Hangzhou|Alibaba"),
    ]
}

/// Write the sample index into `dir` and return its path.
pub fn write_sample_index(dir: &Path) -> PathBuf {
    let path = dir.join("ip2region.db");
    std::fs::write(&path, build_index(&sample_ranges(), 2)).unwrap();
    path
}
