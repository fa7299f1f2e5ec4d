use crate::{Error, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const CONNECT_RETRIES: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);

const INITIAL_POLL_DELAY: Duration = Duration::from_millis(100);
const MAX_POLL_DELAY: Duration = Duration::from_secs(2);

fn next_delay(delay: Duration) -> Duration {
    (delay * 2).min(MAX_POLL_DELAY)
}

/// Quote a Rust string as a JavaScript string literal
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// A live DevTools Protocol session against the portal's browser tab.
///
/// Wraps one page of a locally launched Chrome and exposes the DOM verbs
/// the portal flows need. Every wait is bounded: polling starts at 100 ms,
/// doubles up to 2 s, and fails with [`Error::WaitTimeout`] at the
/// configured deadline.
pub struct PortalSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    timeout: Duration,
}

impl PortalSession {
    /// Connect to a Chrome already listening on `debugging_port`.
    ///
    /// Chrome may not be fully ready right after spawn, so the connection
    /// is retried a few times before giving up.
    pub async fn connect(debugging_port: u16, timeout: Duration) -> Result<Self> {
        let ws_url = format!("http://localhost:{}", debugging_port);
        tracing::info!("Connecting to Chrome on port {}", debugging_port);

        let (browser, mut handler) = {
            let mut retries = CONNECT_RETRIES;
            loop {
                tracing::debug!("Attempting CDP connection to {}...", ws_url);
                match Browser::connect(&ws_url).await {
                    Ok(result) => {
                        tracing::info!("CDP connection established");
                        break result;
                    }
                    Err(e) => {
                        retries -= 1;
                        if retries == 0 {
                            return Err(Error::Cdp(format!(
                                "Failed to connect to Chrome after {} attempts: {}",
                                CONNECT_RETRIES, e
                            )));
                        }
                        tracing::info!("CDP connection attempt failed, retrying... ({} left)", retries);
                        tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                    }
                }
            }
        };

        // The handler task must pump protocol messages for any page
        // command to complete.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        // Give Chrome a moment to create its initial tab.
        tokio::time::sleep(CONNECT_RETRY_DELAY).await;

        let page = if let Some(page) = browser.pages().await?.first() {
            tracing::debug!("Using existing page");
            page.clone()
        } else {
            tracing::debug!("No existing pages, creating new page");
            browser.new_page("about:blank").await?
        };

        Ok(Self {
            browser,
            page,
            handler_task,
            timeout,
        })
    }

    /// Navigate the tab and wait for the load to settle
    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.page.goto(url).await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    /// Find a single element now, erroring with the selector if absent
    pub async fn find(&self, selector: &str) -> Result<Element> {
        self.page
            .find_element(selector)
            .await
            .map_err(|e| Error::Browser(format!("element '{}' not found: {}", selector, e)))
    }

    /// Find all elements matching a selector (empty when none match)
    pub async fn find_all(&self, selector: &str) -> Result<Vec<Element>> {
        Ok(self.page.find_elements(selector).await?)
    }

    /// Whether at least one element matches the selector right now
    pub async fn exists(&self, selector: &str) -> Result<bool> {
        Ok(!self.find_all(selector).await?.is_empty())
    }

    /// Wait for an element to appear, with backoff up to the deadline
    pub async fn wait_for(&self, selector: &str) -> Result<Element> {
        let deadline = Instant::now() + self.timeout;
        let mut delay = INITIAL_POLL_DELAY;

        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                return Ok(element);
            }
            if Instant::now() + delay >= deadline {
                return Err(Error::WaitTimeout {
                    what: format!("element '{}'", selector),
                    waited_ms: self.timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(delay).await;
            delay = next_delay(delay);
        }
    }

    /// Wait until an element's text no longer contains `needle`.
    ///
    /// Used for grids that render a "no items" placeholder while results
    /// load. An element that never appears, or whose placeholder never
    /// clears, times out.
    pub async fn wait_until_text_gone(&self, selector: &str, needle: &str) -> Result<()> {
        let deadline = Instant::now() + self.timeout;
        let mut delay = INITIAL_POLL_DELAY;

        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                let text = element.inner_text().await?.unwrap_or_default();
                if !text.contains(needle) {
                    return Ok(());
                }
            }
            if Instant::now() + delay >= deadline {
                return Err(Error::WaitTimeout {
                    what: format!("'{}' to clear from '{}'", needle, selector),
                    waited_ms: self.timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(delay).await;
            delay = next_delay(delay);
        }
    }

    /// Wait for an element and click it
    pub async fn click(&self, selector: &str) -> Result<()> {
        let element = self.wait_for(selector).await?;
        element.click().await?;
        Ok(())
    }

    /// Wait for an input, clear it, and type the given text
    pub async fn type_into(&self, selector: &str, text: &str) -> Result<()> {
        let element = self.wait_for(selector).await?;
        element
            .call_js_fn("function() { this.value = ''; }", false)
            .await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    /// Wait for a `<select>` and choose the option with the given value
    pub async fn select_by_value(&self, selector: &str, value: &str) -> Result<()> {
        self.wait_for(selector).await?;

        let js = format!(
            r#"(() => {{
                const el = document.querySelector({selector});
                if (!el) return false;
                el.value = {value};
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return el.value === {value};
            }})()"#,
            selector = js_string(selector),
            value = js_string(value),
        );

        if self.evaluate::<bool>(js).await? {
            Ok(())
        } else {
            Err(Error::Browser(format!(
                "select '{}' has no option with value '{}'",
                selector, value
            )))
        }
    }

    /// Wait for a `<select>` and choose the option with the given visible text
    pub async fn select_by_label(&self, selector: &str, label: &str) -> Result<()> {
        self.wait_for(selector).await?;

        let js = format!(
            r#"(() => {{
                const el = document.querySelector({selector});
                if (!el) return false;
                const wanted = {label};
                for (let i = 0; i < el.options.length; i++) {{
                    if (el.options[i].textContent.trim() === wanted) {{
                        el.selectedIndex = i;
                        el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                        return true;
                    }}
                }}
                return false;
            }})()"#,
            selector = js_string(selector),
            label = js_string(label),
        );

        if self.evaluate::<bool>(js).await? {
            Ok(())
        } else {
            Err(Error::Browser(format!(
                "select '{}' has no option labeled '{}'",
                selector, label
            )))
        }
    }

    /// Rendered text of the first element matching the selector
    pub async fn inner_text(&self, selector: &str) -> Result<String> {
        let element = self.find(selector).await?;
        Ok(element.inner_text().await?.unwrap_or_default())
    }

    /// An attribute of the first element matching the selector
    pub async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let element = self.find(selector).await?;
        Ok(element.attribute(name).await?)
    }

    /// Evaluate a JavaScript expression and decode its JSON result
    pub async fn evaluate<T: DeserializeOwned>(&self, js: impl Into<String>) -> Result<T> {
        let result = self.page.evaluate(js.into()).await?;
        let value = result.value().cloned().unwrap_or(serde_json::Value::Null);
        serde_json::from_value(value)
            .map_err(|e| Error::Cdp(format!("unexpected evaluation result: {}", e)))
    }

    /// Browser handle, for callers that need more than the DOM verbs
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Tear the session down, stopping the protocol handler task
    pub fn close(self) {
        self.handler_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_delay_doubles_and_caps() {
        let mut delay = INITIAL_POLL_DELAY;
        let mut schedule = Vec::new();
        for _ in 0..6 {
            schedule.push(delay.as_millis());
            delay = next_delay(delay);
        }
        assert_eq!(schedule, vec![100, 200, 400, 800, 1600, 2000]);

        // Stays pinned at the cap.
        assert_eq!(next_delay(delay).as_millis(), 2000);
    }

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(js_string("Division 1"), r#""Division 1""#);
        assert_eq!(js_string(r#"say "hi""#), r#""say \"hi\"""#);
    }

    // Session tests against a live DOM require a running Chrome and are
    // exercised end to end through the CLI.
}
