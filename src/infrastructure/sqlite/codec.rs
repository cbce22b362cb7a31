//! Little-endian `f32` blob encoding for stored vectors.

use crate::domain::values::distance::cosine_distance;

pub fn encode(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

pub fn decode(bytes: &[u8]) -> Result<Vec<f32>, String> {
    if bytes.len() % 4 != 0 {
        return Err(format!("vector blob of {} bytes is not a whole number of f32", bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Cosine distance between two encoded vectors of equal width.
pub fn blob_distance(a: &[u8], b: &[u8]) -> Result<f64, String> {
    if a.len() != b.len() {
        return Err(format!("vector blobs differ in size ({} vs {} bytes)", a.len(), b.len()));
    }
    Ok(cosine_distance(&decode(a)?, &decode(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout_is_little_endian() {
        assert_eq!(encode(&[1.0]), vec![0x00, 0x00, 0x80, 0x3f]);
        assert_eq!(decode(&[0x00, 0x00, 0x80, 0x3f]).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_decode_rejects_truncated_blob() {
        assert!(decode(&[0, 0, 0]).is_err());
    }

    #[test]
    fn test_blob_distance_rejects_width_mismatch() {
        let a = encode(&[1.0, 0.0]);
        let b = encode(&[1.0, 0.0, 0.0]);
        assert!(blob_distance(&a, &b).is_err());
        assert!(blob_distance(&a, &a).unwrap().abs() < 1e-9);
    }
}
