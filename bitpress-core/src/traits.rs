//! Core traits shared by the bitpress codecs.

use crate::error::Result;
use std::path::Path;

/// A file-to-file codec.
///
/// Implementors carry their own encoding parameters, so a caller can pick a
/// codec at runtime and drive it through `&dyn FileCodec` without knowing
/// which algorithm it wraps. Decoding never takes parameters: every file
/// describes itself in its header.
pub trait FileCodec {
    /// Short codec name used in logs and CLI output.
    fn name(&self) -> &'static str;

    /// Compress the file at `input` into a new file at `output`.
    fn compress(&self, input: &Path, output: &Path) -> Result<()>;

    /// Decode the file at `input` into a new file at `output`.
    fn decode(&self, input: &Path, output: &Path) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl FileCodec for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn compress(&self, input: &Path, output: &Path) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("compress {} {}", input.display(), output.display()));
            Ok(())
        }

        fn decode(&self, input: &Path, output: &Path) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("decode {} {}", input.display(), output.display()));
            Ok(())
        }
    }

    #[test]
    fn test_dispatch_through_trait_object() {
        let recorder = Recorder {
            calls: RefCell::new(Vec::new()),
        };
        let codec: &dyn FileCodec = &recorder;

        codec.compress(Path::new("a"), Path::new("b")).unwrap();
        codec.decode(Path::new("b"), Path::new("c")).unwrap();

        assert_eq!(codec.name(), "recorder");
        assert_eq!(*recorder.calls.borrow(), vec!["compress a b", "decode b c"]);
    }
}
