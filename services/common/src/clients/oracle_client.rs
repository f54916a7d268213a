//! OpenAI-compatible advisory oracle client
//!
//! Requests a JSON object from the chat completions endpoint and decodes
//! the first choice into a raw recommendation. Schema validation happens
//! downstream when the raw value is converted into a verdict.

use crate::clients::AdvisoryOracle;
use crate::config::OracleClientConfig;
use crate::errors::AdvisoryError;
use crate::types::{AdvisoryContext, OracleRecommendation, OracleSentiment};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const RECOMMENDATION_SCHEMA: &str = "Respond only with a JSON object of the form \
{\"signal\": \"BUY\" | \"SELL\" | \"HOLD\", \"confidence\": number between 0 and 1, \
\"reasoning\": string, \"targetPrice\"?: number, \"stopLoss\"?: number, \"takeProfit\"?: number}.";

const SENTIMENT_SCHEMA: &str = "Respond only with a JSON object of the form \
{\"sentiment\": \"BULLISH\" | \"BEARISH\" | \"NEUTRAL\", \"score\": number between -1 and 1, \
\"summary\": string}.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    content: Option<String>,
}

/// Advisory oracle speaking the OpenAI chat completions protocol
#[derive(Debug, Clone)]
pub struct OracleClient {
    client: Client,
    config: OracleClientConfig,
}

impl OracleClient {
    pub fn new(config: OracleClientConfig) -> Result<Self, AdvisoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|e| AdvisoryError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    async fn complete<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: String,
    ) -> Result<T, AdvisoryError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AdvisoryError::Transport("advisory api key not configured".to_string()))?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let url = format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Advisory oracle returned non-success status");
            return Err(AdvisoryError::Http {
                status: status.as_u16(),
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AdvisoryError::Malformed(e.to_string()))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AdvisoryError::Malformed("response has no message content".to_string()))?;

        debug!(bytes = content.len(), "Advisory oracle responded");
        serde_json::from_str(&content).map_err(|e| AdvisoryError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl AdvisoryOracle for OracleClient {
    async fn recommend(
        &self,
        context: &AdvisoryContext,
    ) -> Result<OracleRecommendation, AdvisoryError> {
        self.complete(RECOMMENDATION_SCHEMA, render_market_prompt(context))
            .await
    }

    async fn sentiment(
        &self,
        symbol: &str,
        news: Option<&[String]>,
    ) -> Result<OracleSentiment, AdvisoryError> {
        self.complete(SENTIMENT_SCHEMA, render_sentiment_prompt(symbol, news))
            .await
    }
}

/// Prompt describing the market state and the decision guidelines
pub fn render_market_prompt(context: &AdvisoryContext) -> String {
    let ind = &context.indicators;
    let recent = context
        .recent_closes
        .iter()
        .map(|p| format!("{p:.2}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Analyze the following market data for {symbol} and provide a trading signal.

Current price: ${price:.2}

Technical indicators:
- RSI: {rsi:.2}
- MACD: {macd:.4}
- MACD signal: {macd_signal:.4}
- EMA 20: {ema20:.2}
- EMA 50: {ema50:.2}
- Bollinger upper: {upper:.2}
- Bollinger lower: {lower:.2}

Recent prices: {recent}
Volume: {volume:.2}
Market trend: {trend}

Consider:
1. Intraday trading (short-lived positions)
2. Conservative risk management
3. Clear technical signals
4. Market volatility
5. Trading volume

Give a clear signal with high confidence only if there is an evident opportunity.",
        symbol = context.symbol,
        price = context.current_price,
        rsi = ind.rsi,
        macd = ind.macd.macd,
        macd_signal = ind.macd.signal,
        ema20 = ind.ema20,
        ema50 = ind.ema50,
        upper = ind.bollinger.upper,
        lower = ind.bollinger.lower,
        volume = context.volume_24h,
        trend = context.trend,
    )
}

/// Prompt asking for overall market sentiment
pub fn render_sentiment_prompt(symbol: &str, news: Option<&[String]>) -> String {
    let basis = match news {
        Some(items) if !items.is_empty() => format!("Recent news:\n{}", items.join("\n")),
        _ => "General technical analysis of the market".to_string(),
    };
    format!(
        "Analyze {symbol} market sentiment based on:\n{basis}\n\n\
         Provide:\n\
         1. Overall sentiment (BULLISH/BEARISH/NEUTRAL)\n\
         2. A score from -1 (very bearish) to 1 (very bullish)\n\
         3. A summary of the analysis"
    )
}
