use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;

/// Where the fallback dataset comes from when nothing is uploaded.
#[async_trait]
pub trait SampleSource: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<Bytes>;
    fn url(&self) -> &str;
}

pub struct HttpSampleSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSampleSource {
    pub fn new(url: String) -> Self {
        Self { url, client: reqwest::Client::new() }
    }
}

#[async_trait]
impl SampleSource for HttpSampleSource {
    async fn fetch(&self) -> anyhow::Result<Bytes> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("sample request to {} failed", self.url))?
            .error_for_status()?;
        Ok(resp.bytes().await?)
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Fixed in-memory body.
#[cfg(test)]
pub struct StaticSampleSource {
    url: String,
    body: Bytes,
}

#[cfg(test)]
impl StaticSampleSource {
    pub fn new(url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self { url: url.into(), body: body.into() }
    }
}

#[cfg(test)]
#[async_trait]
impl SampleSource for StaticSampleSource {
    async fn fetch(&self) -> anyhow::Result<Bytes> {
        Ok(self.body.clone())
    }

    fn url(&self) -> &str {
        &self.url
    }
}
