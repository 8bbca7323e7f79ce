use super::{Address, AddressError};

/// Simple email envelope representation
///
/// The envelope is the addressing handed to the provider, independent of the
/// `From`, `To`, `Cc` and `Bcc` header lines inside the raw message.
#[derive(PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Envelope {
    /// The envelope recipient's addresses
    ///
    /// This can not be empty.
    forward_path: Vec<Address>,
    /// The envelope sender address
    reverse_path: Option<Address>,
}

impl Envelope {
    /// Creates a new envelope, which may fail if `to` is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sesmail::{Address, Envelope};
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let sender = "sender@email.com".parse::<Address>()?;
    /// let recipients = vec!["to@email.com".parse::<Address>()?];
    ///
    /// let envelope = Envelope::new(Some(sender), recipients);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// If `to` has no elements in it.
    pub fn new(from: Option<Address>, to: Vec<Address>) -> Result<Envelope, AddressError> {
        if to.is_empty() {
            return Err(AddressError::NoRecipient);
        }
        Ok(Envelope {
            forward_path: to,
            reverse_path: from,
        })
    }

    /// Creates an envelope from every sender listed by a message.
    ///
    /// Providers accept a single envelope sender, so only the first
    /// address of `from` is kept.
    pub fn from_senders<I>(from: I, to: Vec<Address>) -> Result<Envelope, AddressError>
    where
        I: IntoIterator<Item = Address>,
    {
        Envelope::new(from.into_iter().next(), to)
    }

    /// Gets the destination addresses of the envelope, in order.
    pub fn to(&self) -> &[Address] {
        self.forward_path.as_slice()
    }

    /// Gets the sender of the envelope.
    pub fn from(&self) -> Option<&Address> {
        self.reverse_path.as_ref()
    }
}

// Deserialized envelopes go through `Envelope::new`, so an empty forward path is refused
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Envelope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Paths {
            forward_path: Vec<Address>,
            #[serde(default)]
            reverse_path: Option<Address>,
        }

        let paths = Paths::deserialize(deserializer)?;
        Envelope::new(paths.reverse_path, paths.forward_path).map_err(serde::de::Error::custom)
    }
}
