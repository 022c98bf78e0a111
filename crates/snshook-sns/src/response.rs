//! Reading SNS query-API XML responses.
//!
//! SNS answers every query-API call with a small XML document. snshook only
//! needs a handful of leaf elements out of them, so instead of modelling each
//! response type this module collects the text of elements by local name.

use quick_xml::Reader;
use quick_xml::events::Event;
use snshook_http::HttpMessage;

use crate::error::ResponseError;

/// One page of a `ListTopics` response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicPage {
    /// Topic ARNs on this page.
    pub topic_arns: Vec<String>,
    /// Token for the next page, if there is one.
    pub next_token: Option<String>,
}

/// Collect the text content of every element named `name`, in document order.
///
/// Namespace prefixes are ignored.
pub fn element_texts(xml: &str, name: &str) -> Result<Vec<String>, ResponseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut texts = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader
            .read_event()
            .map_err(|e| ResponseError::Xml(e.to_string()))?
        {
            Event::Start(e) if e.local_name().as_ref() == name.as_bytes() => {
                current = Some(String::new());
            }
            Event::Text(e) => {
                if let Some(text) = current.as_mut() {
                    let decoded = e.decode().map_err(|err| ResponseError::Xml(err.to_string()))?;
                    let unescaped = quick_xml::escape::unescape(&decoded)
                        .map_err(|err| ResponseError::Xml(err.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Event::End(e) if e.local_name().as_ref() == name.as_bytes() => {
                if let Some(text) = current.take() {
                    texts.push(text);
                }
            }
            Event::Eof => return Ok(texts),
            _ => {}
        }
    }
}

/// Fail with [`ResponseError::Service`] unless `response` has a 2xx status.
pub fn ensure_success(response: &HttpMessage) -> Result<(), ResponseError> {
    let status = response.status_code().unwrap_or_default();
    if (200..300).contains(&status) {
        return Ok(());
    }

    let first = |name: &str| {
        element_texts(&response.body, name)
            .ok()
            .and_then(|texts| texts.into_iter().next())
            .unwrap_or_default()
    };

    Err(ResponseError::Service {
        status,
        code: first("Code"),
        message: first("Message"),
    })
}

/// Read one page of a `ListTopics` response body.
pub fn parse_topic_page(xml: &str) -> Result<TopicPage, ResponseError> {
    Ok(TopicPage {
        topic_arns: element_texts(xml, "TopicArn")?,
        next_token: element_texts(xml, "NextToken")?
            .into_iter()
            .find(|token| !token.is_empty()),
    })
}

/// Read the `SubscriptionArn` of a `Subscribe` response body.
///
/// For an HTTP endpoint this is the literal `pending confirmation` until the
/// endpoint confirms.
pub fn parse_subscription_arn(xml: &str) -> Result<Option<String>, ResponseError> {
    Ok(element_texts(xml, "SubscriptionArn")?.into_iter().next())
}
