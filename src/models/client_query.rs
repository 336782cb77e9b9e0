/// Search filter for clients.
///
/// When `phone` is set the search matches clients owning at least one equal
/// phone number and the other filters are ignored. Otherwise the provided
/// name/email fields are combined with OR; absent fields never match
/// anything, so a fully empty query yields an empty result.
#[derive(Debug, Clone, Default)]
pub struct ClientQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ClientQuery {
    /// True when none of the name/email filters is set.
    pub fn has_no_field_filters(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}
