/// Field-by-field update instructions for an existing client.
///
/// `None` leaves the stored value untouched; the name and email columns are
/// NOT NULL, so an absent field can never be confused with a stored value.
/// `phones: Some(..)` replaces the client's entire phone set, including
/// `Some(vec![])` which clears it; `phones: None` keeps the current set.
#[derive(Debug, Clone, Default)]
pub struct ClientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phones: Option<Vec<String>>,
}

impl ClientUpdate {
    /// True when no field is staged at all, so applying it is a no-op.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phones.is_none()
    }

    /// True when at least one of the name/email columns is staged.
    pub fn has_field_changes(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some() || self.email.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_update_is_empty() {
        assert!(ClientUpdate::default().is_empty());
        assert!(!ClientUpdate::default().has_field_changes());
    }

    #[test]
    fn single_field_is_not_empty() {
        let update = ClientUpdate {
            email: Some("new@example.com".into()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert!(update.has_field_changes());
    }

    #[test]
    fn empty_phone_list_still_counts_as_staged() {
        let update = ClientUpdate {
            phones: Some(Vec::new()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert!(!update.has_field_changes());
    }
}
