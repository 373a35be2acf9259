//! Run-length coding over fixed-size pixel units.
//!
//! A stream is a sequence of `[count][unit]` records where `count` is a single
//! byte in `1..=255` and `unit` is `unit_size` bytes long.

use crate::error::Error;

/// Longest run a single record can hold.
pub const MAX_RUN: usize = 255;

/// Run-length encode `data`, treating it as a sequence of `unit_size`-byte
/// units.
///
/// Runs are extended greedily, so the output is the canonical encoding for a
/// given input. `data.len()` must be a multiple of `unit_size`; a trailing
/// partial unit is emitted as its own record.
pub fn encode(data: &[u8], unit_size: usize) -> Vec<u8> {
    assert!(unit_size > 0, "RLE unit size must be non-zero");

    let mut output = Vec::with_capacity(data.len() / unit_size * (unit_size + 1));
    let mut units = data.chunks(unit_size).peekable();

    while let Some(unit) = units.next() {
        let mut count = 1;
        while count < MAX_RUN && units.next_if_eq(&unit).is_some() {
            count += 1;
        }

        output.push(count as u8);
        output.extend_from_slice(unit);
    }

    output
}

/// Expand a run-length encoded stream back into raw units.
///
/// A truncated record or a record with a count of zero fails with
/// [`Error::MalformedRle`] carrying the record's offset.
pub fn decode(data: &[u8], unit_size: usize) -> Result<Vec<u8>, Error> {
    assert!(unit_size > 0, "RLE unit size must be non-zero");

    let mut output = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let record = data
            .get(offset..offset + 1 + unit_size)
            .ok_or(Error::MalformedRle(offset))?;

        let count = record[0] as usize;
        if count == 0 {
            return Err(Error::MalformedRle(offset));
        }

        let unit = &record[1..];
        for _ in 0..count {
            output.extend_from_slice(unit);
        }

        offset += 1 + unit_size;
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_runs() {
        let data = [1, 2, 3, 1, 2, 3, 4, 5, 6];
        assert_eq!(encode(&data, 3), vec![2, 1, 2, 3, 1, 4, 5, 6]);
    }

    #[test]
    fn run_cap_splits_long_runs() {
        let data = [7u8, 8, 9].repeat(300);
        let encoded = encode(&data, 3);

        assert_eq!(encoded, vec![255, 7, 8, 9, 45, 7, 8, 9]);
        assert_eq!(decode(&encoded, 3).unwrap(), data);
    }

    #[test]
    fn four_byte_units() {
        let data = [0u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
        let encoded = encode(&data, 4);

        assert_eq!(encoded, vec![2, 0, 0, 0, 0, 1, 0, 0, 0, 1]);
        assert_eq!(decode(&encoded, 4).unwrap(), data);
    }

    #[test]
    fn unit_size_sets_run_length() {
        let data = [5u8; 12];
        assert_eq!(encode(&data, 3), vec![4, 5, 5, 5]);
        assert_eq!(encode(&data, 4), vec![3, 5, 5, 5, 5]);
    }

    #[test]
    fn empty_input() {
        assert!(encode(&[], 3).is_empty());
        assert!(decode(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn roundtrip_mixed() {
        let data: Vec<u8> = (0..600u32)
            .flat_map(|i| {
                let v = (i / 7) as u8;
                [v, v.wrapping_mul(3), 0, 255]
            })
            .collect();

        for unit_size in [3, 4] {
            let usable = data.len() - data.len() % unit_size;
            let slice = &data[..usable];
            assert_eq!(decode(&encode(slice, unit_size), unit_size).unwrap(), slice);
        }
    }

    #[test]
    fn truncated_record() {
        assert!(matches!(decode(&[2, 1, 2], 3), Err(Error::MalformedRle(0))));
        assert!(matches!(
            decode(&[1, 1, 2, 3, 4, 9], 3),
            Err(Error::MalformedRle(4))
        ));
    }

    #[test]
    fn zero_count_record() {
        assert!(matches!(
            decode(&[0, 1, 2, 3, 1, 9, 9, 9], 3),
            Err(Error::MalformedRle(0))
        ));
        assert!(matches!(
            decode(&[1, 9, 9, 9, 9, 0, 0, 0, 0, 0], 4),
            Err(Error::MalformedRle(5))
        ));
    }
}
