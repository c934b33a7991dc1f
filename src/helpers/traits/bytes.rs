pub trait SplitBytes<'a> {
    fn find_bytes(self, needle: &[u8]) -> Option<usize>;
    fn split_bytes(self, delimiter: &[u8]) -> Vec<&'a [u8]>;
    fn split_header_body(self) -> Option<(&'a [u8], &'a [u8])>;
    fn trim_crlf(self) -> &'a [u8];
}

impl<'a> SplitBytes<'a> for &'a [u8] {
    fn find_bytes(self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.len() {
            return None;
        }
        self.windows(needle.len()).position(|window| window == needle)
    }

    /// Splits on every occurrence of `delimiter`. Always yields at least one
    /// slice; leading, trailing and adjacent delimiters produce empty slices.
    fn split_bytes(self, delimiter: &[u8]) -> Vec<&'a [u8]> {
        let mut result = Vec::new();
        let mut start = 0;

        while let Some(pos) = self[start..].find_bytes(delimiter) {
            result.push(&self[start..start + pos]);
            start += pos + delimiter.len();
        }
        result.push(&self[start..]);

        result
    }

    fn split_header_body(self) -> Option<(&'a [u8], &'a [u8])> {
        let delimiter = b"\r\n\r\n";
        let pos = self.find_bytes(delimiter)?;
        Some((&self[..pos], &self[pos + delimiter.len()..]))
    }

    /// Removes at most one leading and one trailing `\r\n`.
    ///
    /// A delimiter line written with extra leading dashes (`------boundary` for
    /// the delimiter `----boundary`) leaves `\r\n--...` at the end of the slice
    /// before it; that line break and its dashes are removed as well.
    fn trim_crlf(self) -> &'a [u8] {
        let data = self.strip_prefix(b"\r\n").unwrap_or(self);
        if let Some(data) = data.strip_suffix(b"\r\n") {
            return data;
        }

        let dashes = data.iter().rev().take_while(|&&b| b == b'-').count();
        if dashes == 0 {
            return data;
        }
        data[..data.len() - dashes]
            .strip_suffix(b"\r\n")
            .unwrap_or(data)
    }
}
