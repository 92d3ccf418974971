use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{HistoryRequest, PriceSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest};
use crate::{MarketDate, PriceHistory, PricePoint, PriceProvider, Symbol};

const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SECONDS_PER_DAY: i64 = 86_400;

/// Yahoo Finance chart-API adapter.
///
/// Fetches daily bars over `[start, end]` and keeps only the adjusted close.
/// Symbols are suffixed with a market extension before querying; the suffix
/// defaults to the Mexican exchange (`.MX`).
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    market_suffix: String,
}

impl YahooAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            market_suffix: String::from(".MX"),
        }
    }

    pub fn with_market_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.market_suffix = suffix.into();
        self
    }

    fn chart_url(&self, req: &HistoryRequest) -> String {
        let listed_symbol = format!("{}{}", req.symbol, self.market_suffix);
        // period2 is exclusive upstream, so push it one day past the range end.
        let period1 = req.start.unix_timestamp();
        let period2 = req.end.unix_timestamp() + SECONDS_PER_DAY;

        format!(
            "{CHART_ENDPOINT}/{}?period1={period1}&period2={period2}&interval=1d&events=div%2Csplit",
            urlencoding::encode(&listed_symbol)
        )
    }

    fn parse_chart(&self, body: &str, symbol: &Symbol) -> Result<PriceHistory, SourceError> {
        let response: ChartResponse = serde_json::from_str(body)
            .map_err(|error| SourceError::internal(format!("failed to parse yahoo chart: {error}")))?;

        if let Some(error) = response.chart.error {
            if error.code.eq_ignore_ascii_case("not found") {
                return Err(SourceError::unknown_symbol(symbol));
            }
            return Err(SourceError::unavailable(format!(
                "yahoo chart error: {} ({})",
                error.description, error.code
            )));
        }

        let result = response
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::internal("no chart data in response"))?;

        let adjclose = result
            .indicators
            .adjclose
            .into_iter()
            .next()
            .map(|block| block.adjclose)
            .unwrap_or_default();

        let mut points: Vec<PricePoint> = Vec::with_capacity(result.timestamp.len());
        for (index, &seconds) in result.timestamp.iter().enumerate() {
            let date = MarketDate::from_unix_timestamp(seconds)
                .map_err(|error| SourceError::internal(error.to_string()))?;

            // The chart API occasionally repeats the final session; keep the
            // first observation per date.
            if points.last().is_some_and(|last| last.date >= date) {
                continue;
            }

            let adj_close = adjclose
                .get(index)
                .copied()
                .flatten()
                .filter(|price| price.is_finite());
            points.push(PricePoint { date, adj_close });
        }

        PriceHistory::new(symbol.clone(), points)
            .map_err(|error| SourceError::internal(error.to_string()))
    }
}

impl PriceSource for YahooAdapter {
    fn id(&self) -> PriceProvider {
        PriceProvider::Yahoo
    }

    fn daily_history<'a>(
        &'a self,
        req: &'a HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::get(self.chart_url(req))
                .with_header("referer", "https://finance.yahoo.com/")
                .with_timeout_ms(10_000);

            let response = self.http_client.execute(request).await.map_err(|error| {
                if error.retryable() {
                    SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
                } else {
                    SourceError::internal(format!("yahoo transport error: {}", error.message()))
                }
            })?;

            if response.status == 404 {
                return Err(SourceError::unknown_symbol(&req.symbol));
            }
            if response.status == 429 {
                return Err(SourceError::rate_limited("yahoo rate limited the chart request"));
            }
            if !response.is_success() {
                return Err(SourceError::unavailable(format!(
                    "yahoo returned status {}",
                    response.status
                )));
            }

            self.parse_chart(&response.body, &req.symbol)
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    adjclose: Vec<AdjCloseBlock>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseBlock {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
