//! Contact records - the unit of input

/// Column names of a contact record, in output order
pub const CONTACT_FIELDS: [&str; 3] = ["name", "organization", "email"];

/// A single contact as read from the input file
///
/// Records are immutable once loaded. `email` is the join key between a
/// record and the model's verdict; uniqueness within a run is assumed but
/// not enforced.
///
/// # Examples
///
/// ```
/// use cleanser_domain::ContactRecord;
///
/// let contact = ContactRecord::new("Ada Lovelace", "Analytical Engines", "ada@engines.io");
/// assert_eq!(contact.email, "ada@engines.io");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContactRecord {
    /// Full name
    pub name: String,

    /// Organization the contact belongs to
    pub organization: String,

    /// Work email, used as the reconciliation key
    pub email: String,
}

impl ContactRecord {
    /// Create a new contact record
    pub fn new(
        name: impl Into<String>,
        organization: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            organization: organization.into(),
            email: email.into(),
        }
    }

    /// Field values in [`CONTACT_FIELDS`] order
    pub fn fields(&self) -> [&str; 3] {
        [&self.name, &self.organization, &self.email]
    }
}
