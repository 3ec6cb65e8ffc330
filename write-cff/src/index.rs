//! The INDEX structure.
//!
//! See "5 INDEX Data" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf>

use crate::write::{CffWrite, CffWriter};

/// The most objects an INDEX can hold.
pub(crate) const MAX_INDEX_COUNT: usize = u16::MAX as usize;

/// The minimal number of bytes needed to store `value` as an offset.
pub fn offset_size(value: u32) -> u8 {
    (4 - value.leading_zeros() / 8).max(1) as u8
}

/// The size of an INDEX of `count` objects with `total` bytes of data.
pub fn index_size(count: usize, total: u32) -> u32 {
    if count == 0 {
        2
    } else {
        3 + offset_size(total + 1) as u32 * (count as u32 + 1) + total
    }
}

/// The start of an INDEX: count, offSize and the first offset.
///
/// The remaining offsets and the data are up to the caller.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IndexHeader {
    pub count: u16,
    pub total: u32,
}

impl IndexHeader {
    pub(crate) fn off_size(&self) -> u8 {
        offset_size(self.total + 1)
    }
}

impl CffWrite for IndexHeader {
    fn write_into(&self, writer: &mut CffWriter) {
        self.count.write_into(writer);
        if self.count != 0 {
            let off_size = self.off_size();
            off_size.write_into(writer);
            writer.write_offset(1, off_size);
        }
    }
}

/// An INDEX of byte strings.
#[derive(Clone, Debug, Default)]
pub(crate) struct Index<'a> {
    objects: Vec<&'a [u8]>,
}

impl<'a> Index<'a> {
    pub(crate) fn new(objects: impl IntoIterator<Item = &'a [u8]>) -> Self {
        Self {
            objects: objects.into_iter().collect(),
        }
    }

    pub(crate) fn from_vecs(objects: &'a [Vec<u8>]) -> Self {
        Self::new(objects.iter().map(Vec::as_slice))
    }

    pub(crate) fn count(&self) -> usize {
        self.objects.len()
    }

    pub(crate) fn total_len(&self) -> u32 {
        self.objects.iter().map(|obj| obj.len() as u32).sum()
    }

    pub(crate) fn size(&self) -> u32 {
        index_size(self.count(), self.total_len())
    }
}

impl CffWrite for Index<'_> {
    fn write_into(&self, writer: &mut CffWriter) {
        debug_assert!(self.objects.len() <= MAX_INDEX_COUNT);
        let header = IndexHeader {
            count: self.objects.len() as u16,
            total: self.total_len(),
        };
        header.write_into(writer);
        if header.count == 0 {
            return;
        }
        let off_size = header.off_size();
        let mut offset = 1;
        for obj in &self.objects {
            offset += obj.len() as u32;
            writer.write_offset(offset, off_size);
        }
        for obj in &self.objects {
            writer.write_slice(obj);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_helpers::read_index, write::measure};

    #[test]
    fn off_sizes() {
        assert_eq!(offset_size(0), 1);
        assert_eq!(offset_size(0xff), 1);
        assert_eq!(offset_size(0x100), 2);
        assert_eq!(offset_size(0xffff), 2);
        assert_eq!(offset_size(0x10000), 3);
        assert_eq!(offset_size(0x1000000), 4);
    }

    #[test]
    fn empty_index() {
        let index = Index::default();
        assert_eq!(index.size(), 2);
        assert_eq!(measure(&index), 2);
        assert_eq!(crate::test_helpers::write_to_vec(&index), [0, 0]);
    }

    #[test]
    fn index_layout() {
        let objects = [b"ab".as_slice(), b"", b"cde"];
        let index = Index::new(objects);
        let data = crate::test_helpers::write_to_vec(&index);
        assert_eq!(data, [0, 3, 1, 1, 3, 3, 6, b'a', b'b', b'c', b'd', b'e']);
        assert_eq!(index.size() as usize, data.len());
        let (parsed, len) = read_index(&data);
        assert_eq!(len, data.len());
        assert_eq!(parsed, objects);
    }

    #[test]
    fn size_matches_output_across_off_sizes() {
        for len in [0usize, 100, 254, 255, 300, 0xfffe, 0xffff, 0x10000] {
            let blob = vec![7u8; len];
            let objects = vec![blob.clone(), Vec::new(), blob];
            let index = Index::from_vecs(&objects);
            let data = crate::test_helpers::write_to_vec(&index);
            assert_eq!(index.size() as usize, data.len(), "{len}");
            let (parsed, _) = read_index(&data);
            assert_eq!(parsed.len(), 3);
            assert_eq!(parsed[0].len(), len);
            assert!(parsed[1].is_empty());
        }
    }
}
