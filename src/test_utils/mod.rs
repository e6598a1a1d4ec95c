#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod stores;

pub(crate) use html::{assert_valid_html, parse_html_document};
pub(crate) use http::{assert_content_type, parse_json_body};
pub(crate) use stores::{SpyAppState, spy_state};
