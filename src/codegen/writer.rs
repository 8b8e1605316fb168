/// Indentation-aware buffer for emitted Rust text.
#[derive(Debug, Default)]
pub struct Writer {
    out: String,
    depth: usize,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// One line at the current depth. An empty line gets no indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str("    ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// `open {`, the indented body, then `}`.
    pub fn block(&mut self, open: impl AsRef<str>, body: impl FnOnce(&mut Self)) {
        self.block_with(format!("{} {{", open.as_ref()), "}", body);
    }

    /// Like [`Writer::block`] with explicit delimiter lines: `match x {` / `},`.
    pub fn block_with(&mut self, open: impl AsRef<str>, close: &str, body: impl FnOnce(&mut Self)) {
        self.line(open);
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.line(close);
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_blocks_indent() {
        let mut w = Writer::new();
        w.block("impl Foo", |w| {
            w.block("fn bar()", |w| w.line("1"));
            w.line("");
            w.block_with("const X: [u8; 1] = [", "];", |w| w.line("0,"));
        });
        assert_eq!(
            w.into_string(),
            "impl Foo {\n    fn bar() {\n        1\n    }\n\n    const X: [u8; 1] = [\n        0,\n    ];\n}\n"
        );
    }
}
