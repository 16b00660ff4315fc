use serde::{Deserialize, Serialize};

/// A candidate returned by the search stage, in provider relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub description: String,
    #[serde(rename = "place_id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub full_address: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl AddressRecord {
    /// Record carrying only the display text. Returns `None` for blank text so
    /// an emitted record always has a full address.
    pub fn unresolved(full_address: impl Into<String>) -> Option<Self> {
        let full_address = full_address.into();
        if full_address.trim().is_empty() {
            return None;
        }
        Some(Self {
            full_address,
            street: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: String::new(),
        })
    }

    pub fn from_components(full_address: impl Into<String>, components: &[AddressComponent]) -> Option<Self> {
        let mut record = Self::unresolved(full_address)?;
        let number = ComponentKind::StreetNumber.first_in(components);
        let route = ComponentKind::Route.first_in(components);
        record.street = [number, route]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        record.city = ComponentKind::Locality.value_in(components);
        record.state = ComponentKind::AdministrativeAreaLevel1.value_in(components);
        record.postal_code = ComponentKind::PostalCode.value_in(components);
        record.country = ComponentKind::Country.value_in(components);
        Some(record)
    }

    pub fn is_structured(&self) -> bool {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .any(|field| !field.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Provider type tags that feed a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    StreetNumber,
    Route,
    Locality,
    AdministrativeAreaLevel1,
    PostalCode,
    Country,
}

impl ComponentKind {
    pub fn as_tag(&self) -> &'static str {
        match self {
            ComponentKind::StreetNumber => "street_number",
            ComponentKind::Route => "route",
            ComponentKind::Locality => "locality",
            ComponentKind::AdministrativeAreaLevel1 => "administrative_area_level_1",
            ComponentKind::PostalCode => "postal_code",
            ComponentKind::Country => "country",
        }
    }

    pub fn first_in<'a>(&self, components: &'a [AddressComponent]) -> Option<&'a str> {
        let tag = self.as_tag();
        components
            .iter()
            .find(|component| component.types.iter().any(|t| t == tag))
            .map(|component| component.long_name.as_str())
    }

    fn value_in(&self, components: &[AddressComponent]) -> String {
        self.first_in(components).unwrap_or_default().to_string()
    }
}
