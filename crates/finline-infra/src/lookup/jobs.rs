//! Job listing lookups against the 104 job-bank search API.
//!
//! Full-time (`104:`) and part-time (`pt:`) searches share one fetcher;
//! the mode only changes the `ro` filter parameter. The API requires a
//! same-site Referer header.

use serde_json::Value;

use finline_types::error::LookupError;

use super::read_body;

pub(crate) const SYSTEM_PROMPT: &str = "你是一位求職顧問, 根據提供的職缺清單, \
    以繁體中文整理每筆職缺的職稱、公司、地區與薪資, 並附上簡短建議。";

const JOB_SEARCH_URL: &str = "https://www.104.com.tw/jobs/search/list";
const JOB_SEARCH_REFERER: &str = "https://www.104.com.tw/jobs/search/";

/// How many listings go into the prompt.
const MAX_LISTINGS: usize = 10;

/// Employment-type filter (the API's `ro` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JobMode {
    FullTime,
    PartTime,
}

impl JobMode {
    fn ro(&self) -> &'static str {
        match self {
            JobMode::FullTime => "1",
            JobMode::PartTime => "2",
        }
    }
}

/// Fetch a listing digest for a keyword search.
pub(crate) async fn fetch_jobs(
    http: &reqwest::Client,
    query: &str,
    mode: JobMode,
) -> Result<String, LookupError> {
    let response = http
        .get(JOB_SEARCH_URL)
        .query(&[
            ("ro", mode.ro()),
            ("keyword", query),
            ("order", "15"),
            ("asc", "0"),
            ("page", "1"),
            ("mode", "s"),
        ])
        .header(reqwest::header::REFERER, JOB_SEARCH_REFERER)
        .send()
        .await
        .map_err(|e| LookupError::Request(e.to_string()))?;
    let body = read_body(response).await?;
    let value: Value =
        serde_json::from_str(&body).map_err(|e| LookupError::Payload(e.to_string()))?;
    digest_jobs(&value, query, MAX_LISTINGS)
}

/// Digest the search payload (`data.list` entries) into prompt text.
pub(crate) fn digest_jobs(
    value: &Value,
    query: &str,
    limit: usize,
) -> Result<String, LookupError> {
    let listings = value["data"]["list"]
        .as_array()
        .ok_or_else(|| LookupError::Payload("data.list missing".to_string()))?;

    if listings.is_empty() {
        return Err(LookupError::NoData(query.to_string()));
    }

    let lines: Vec<String> = listings
        .iter()
        .take(limit)
        .map(|job| {
            let title = job["jobName"].as_str().unwrap_or("(無職稱)");
            let company = job["custName"].as_str().unwrap_or("(無公司)");
            let area = job["jobAddrNoDesc"].as_str().unwrap_or("");
            let salary = job["salaryDesc"].as_str().unwrap_or("面議");
            format!("{title} | {company} | {area} | {salary}")
        })
        .collect();

    Ok(format!("關鍵字: {query}\n{}", lines.join("\n")))
}
