//! The version codecs. Each one owns its header layout and payload framing,
//! nothing about one version's layout applies to another.

pub mod v1;
pub mod v2;
pub mod v3;
pub mod v4;

fn warn_trailing(remaining: usize) {
    if remaining > 0 {
        log::warn!("ignoring {remaining} trailing bytes after the last row");
    }
}
