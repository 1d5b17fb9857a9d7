use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use super::{FlickrError, Location, ParseError};

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    id: String,
    title: String,
    url: Url,
}

impl GalleryItem {
    pub fn new(id: &str, title: &str, url: Url) -> Self {
        GalleryItem {
            id: id.to_owned(),
            title: title.to_owned(),
            url,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Reference an image loader can use to download the picture.
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn from_json(index: usize, value: &Value) -> Result<Self, ParseError> {
        let location = Location::Entry(index);
        let entry = value.as_object()
            .ok_or(ParseError::InvalidField {
                field: "photo",
                location,
                reason: "expected an object".into(),
            })?;

        let id = match required(entry, "id", location)? {
            Value::String(id) => id.clone(),
            Value::Number(id) => id.to_string(),
            _ => return Err(invalid(location, "id", "expected a string or a number")),
        };
        if id.is_empty() {
            return Err(invalid(location, "id", "must not be empty"));
        }
        let title = required(entry, "title", location)?
            .as_str()
            .ok_or(invalid(location, "title", "expected a string"))?;
        let url = required(entry, "url_s", location)?
            .as_str()
            .ok_or(invalid(location, "url_s", "expected a string"))?;
        let url = Url::parse(url)
            .map_err(|err| invalid(location, "url_s", &err.to_string()))?;

        Ok(GalleryItem::new(&id, title, url))
    }
}

/// One page of photos, in the order the API returned them.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PhotoListing {
    pub page: Option<u32>,
    pub pages: Option<u32>,
    pub per_page: Option<u32>,
    pub total: Option<u32>,
    items: Vec<GalleryItem>,
}

impl PhotoListing {
    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<GalleryItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        match (self.page, self.pages) {
            (Some(page), Some(pages)) => page < pages,
            _ => false,
        }
    }
}

/// Parses a listing body. Accepts both the bare `{"photo": [...]}` shape and
/// the `{"photos": {...}, "stat": "ok"}` envelope of the REST API.
pub fn parse_listing(body: &str) -> Result<PhotoListing, FlickrError> {
    let root: Value = serde_json::from_str(body)
        .map_err(ParseError::Json)?;
    let root = root.as_object()
        .ok_or(invalid(Location::Listing, "photos", "expected a JSON object"))?;

    if root.get("stat").and_then(Value::as_str) == Some("fail") {
        let code = root.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = root.get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown failure")
            .to_owned();
        return Err(FlickrError::Api { code, message });
    }

    let listing = match root.get("photos") {
        Some(Value::Object(inner)) => inner,
        Some(_) => return Err(invalid(Location::Listing, "photos", "expected an object").into()),
        None => root,
    };

    let items = required(listing, "photo", Location::Listing)?
        .as_array()
        .ok_or(invalid(Location::Listing, "photo", "expected an array"))?
        .iter()
        .enumerate()
        .map(|(index, value)| GalleryItem::from_json(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PhotoListing {
        page: paging(listing, "page")?,
        pages: paging(listing, "pages")?,
        per_page: paging(listing, "perpage")?,
        total: paging(listing, "total")?,
        items,
    })
}

fn required<'a>(object: &'a Map<String, Value>, field: &'static str, location: Location) -> Result<&'a Value, ParseError> {
    match object.get(field) {
        Some(Value::Null) | None => Err(ParseError::MissingField { field, location }),
        Some(value) => Ok(value),
    }
}

fn invalid(location: Location, field: &'static str, reason: &str) -> ParseError {
    ParseError::InvalidField {
        field,
        location,
        reason: reason.to_owned(),
    }
}

// The API is inconsistent here: `total` comes back as a string.
fn paging(object: &Map<String, Value>, field: &'static str) -> Result<Option<u32>, ParseError> {
    let value = match object.get(field) {
        Some(Value::Null) | None => return Ok(None),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.parse::<u64>().ok(),
        Some(_) => None,
    };
    value
        .and_then(|n| u32::try_from(n).ok())
        .map(Some)
        .ok_or(invalid(Location::Listing, field, "expected a non-negative integer"))
}
