use std::io;

use futures_util::stream;

use super::{EmailMessage, MessageStream, StreamOptions};
use crate::address::{Address, Envelope};

const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// A message whose header lines and body are already serialized
///
/// The `Bcc` header is kept apart from the other headers and only written
/// when the transport asks for it with [`StreamOptions::keep_bcc`].
///
/// ```rust
/// # use sesmail::{Address, Envelope, PreparedMessage};
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let envelope = Envelope::new(
///     Some("nobody@domain.tld".parse()?),
///     vec!["hei@domain.tld".parse()?, "hidden@domain.tld".parse()?],
/// )?;
/// let message = PreparedMessage::new(envelope)
///     .header("From", "NoBody <nobody@domain.tld>")
///     .header("To", "Hei <hei@domain.tld>")
///     .header("Subject", "Happy new year")
///     .bcc(vec!["hidden@domain.tld".parse::<Address>()?])
///     .body("Be happy!");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PreparedMessage {
    envelope: Envelope,
    headers: Vec<(String, String)>,
    bcc: Vec<String>,
    body: Vec<u8>,
    chunk_size: usize,
}

impl PreparedMessage {
    /// Creates an empty message submitted with `envelope`
    pub fn new(envelope: Envelope) -> Self {
        PreparedMessage {
            envelope,
            headers: Vec::new(),
            bcc: Vec::new(),
            body: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Appends a header line
    ///
    /// Control characters and whitespace are removed from `name`. Line breaks
    /// in `value` are folded, so a value never starts a header line of its own.
    /// The value of a `Bcc` header joins the blind-copy recipients instead.
    pub fn header<N: AsRef<str>, V: AsRef<str>>(mut self, name: N, value: V) -> Self {
        let name = name
            .as_ref()
            .chars()
            .filter(|c| !c.is_control() && !c.is_whitespace())
            .collect::<String>();
        let value = fold(value.as_ref());

        if name.eq_ignore_ascii_case("bcc") {
            self.bcc.push(value);
        } else {
            self.headers.push((name, value));
        }
        self
    }

    /// Adds blind-copy recipients
    pub fn bcc<I: IntoIterator<Item = Address>>(mut self, addresses: I) -> Self {
        self.bcc.extend(addresses.into_iter().map(String::from));
        self
    }

    /// Sets the body, written after the header block
    ///
    /// The bytes are sent as given, in whatever charset the headers declare.
    pub fn body<B: Into<Vec<u8>>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the maximum size of the body chunks yielded by the stream
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    fn chunks(&self, options: StreamOptions) -> Vec<Vec<u8>> {
        let mut chunks = Vec::with_capacity(self.headers.len() + 2);

        for (name, value) in &self.headers {
            chunks.push(format!("{}: {}\r\n", name, value).into_bytes());
        }

        if options.keeps_bcc() && !self.bcc.is_empty() {
            chunks.push(format!("Bcc: {}\r\n", self.bcc.join(", ")).into_bytes());
        }

        chunks.push(b"\r\n".to_vec());
        chunks.extend(self.body.chunks(self.chunk_size).map(<[u8]>::to_vec));
        chunks
    }
}

// Every line after the first becomes a continuation line (RFC 5322 2.2.3).
// Blank lines are dropped since they would end the header block.
fn fold(value: &str) -> String {
    let mut folded = String::with_capacity(value.len());

    for line in value
        .split(|c: char| c == '\r' || c == '\n')
        .filter(|line| !line.trim().is_empty())
    {
        if !folded.is_empty() {
            folded.push_str("\r\n");
            if !line.starts_with(|c: char| c == ' ' || c == '\t') {
                folded.push(' ');
            }
        }
        folded.push_str(line);
    }
    folded
}

impl EmailMessage for PreparedMessage {
    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn stream(&self, options: StreamOptions) -> MessageStream<'_> {
        let chunks = self.chunks(options).into_iter().map(Ok::<_, io::Error>);
        Box::pin(stream::iter(chunks))
    }
}
