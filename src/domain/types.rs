/// HTTP method used for a catalog endpoint.
///
/// Binance signs every private call the same way, but endpoints differ in
/// where they expect the parameters: `Get` and `Post` carry the signed
/// query in the URL, `PostForm` sends it as a form-encoded body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    PostForm,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post | HttpMethod::PostForm => "POST",
        }
    }
}

/// Exposition type of a metric family. Only gauges are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Gauge,
}

impl ValueKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Gauge => "gauge",
        }
    }
}

/// Declarative description of one wallet data source.
///
/// The catalog of specs is fixed for the process lifetime; adding a wallet
/// type means adding an entry, not touching the collector.
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    /// Output metric family name (lower-case, prefixed).
    pub name: &'static str,
    /// Human-readable family description.
    pub help: &'static str,
    pub value_kind: ValueKind,
    /// JSON key holding the numeric amount in each line item.
    pub value_field: &'static str,
    pub method: HttpMethod,
    /// API path, e.g. `/sapi/v3/asset/getUserAsset`.
    pub endpoint: &'static str,
    /// Fixed extra parameters merged into every signed request.
    pub query: &'static [(&'static str, &'static str)],
    /// Labels applied to every record produced from this spec.
    pub labels: &'static [(&'static str, &'static str)],
    /// When the response wraps its line items in an object, the field
    /// holding the sequence (e.g. `rows`). `None` means the body itself
    /// is the sequence.
    pub unwrap_key: Option<&'static str>,
}

/// One normalized balance sample, produced fresh on every scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub name: &'static str,
    pub help: &'static str,
    pub value_kind: ValueKind,
    pub value: f64,
    /// Always `{job, asset}` plus the spec's fixed labels, in that order.
    pub labels: Vec<(String, String)>,
}
