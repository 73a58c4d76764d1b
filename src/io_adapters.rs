use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::io::{BufRead, Result as IoResult, Write};
use std::rc::Rc;

/// Where the read-eval loop gets its lines from.
pub trait LineSource {
    /// Show `prompt` and block until a full line is available.
    ///
    /// Returns `Ok(None)` at end of input. The returned line may still carry
    /// its trailing newline; the tokenizer treats it as a delimiter.
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>>;
}

/// Line source over any buffered reader, writing the prompt to `prompt_out`.
///
/// Used for piped input and in tests. Bytes that are not valid UTF-8 are
/// replaced rather than rejected. A last line without a newline is still
/// returned; the read after it reports end of input.
pub struct PlainLines<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> PlainLines<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }

    /// Give back the prompt writer, e.g. to inspect what was printed.
    pub fn into_prompt_out(self) -> W {
        self.prompt_out
    }
}

impl<R: BufRead, W: Write> LineSource for PlainLines<R, W> {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.prompt_out.write_all(prompt.as_bytes())?;
        self.prompt_out.flush()?;

        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

/// Interactive line source backed by `rustyline`.
///
/// Ctrl-C at the prompt discards the current line and prompts again; Ctrl-D on
/// an empty line ends input. Lines are not added to any history.
pub struct EditorLines {
    editor: DefaultEditor,
}

impl EditorLines {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorLines {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Memory-backed writer for capturing what builtins print.
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self {
            buf: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A writer together with a shared view of the bytes it collects, for
    /// when the writer itself is moved away.
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let writer = Self::new();
        let collected = Rc::clone(&writer.buf);
        (writer, collected)
    }

    /// Collected bytes, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.borrow()).into_owned()
    }
}

impl Default for MemWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
