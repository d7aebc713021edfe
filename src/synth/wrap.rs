use super::types::{BodyStep, ResponseContract, ResponseShape};
use crate::resource::ResourceConfiguration;
use http::StatusCode;

/// Variable holding the wrapper instance
const WRAPPED: &str = "response";

fn declared(config: &ResourceConfiguration, shape: &ResponseShape) -> String {
    let bare = shape.declared_type();
    match &config.response_wrapper_type {
        Some(wrapper) => format!("{wrapper}<{bare}>"),
        None => bare,
    }
}

/// Contract of an operation that returns `shape`, without touching a body
///
/// Used by operations that delegate to another operation and return its
/// already-wrapped result.
pub fn contract_for(config: &ResourceConfiguration, shape: ResponseShape) -> ResponseContract {
    let status_on_success = if shape == ResponseShape::Empty {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::OK
    };
    ResponseContract {
        declared_type: declared(config, &shape),
        wrapped: config.is_wrapped(),
        shape,
        status_on_success,
    }
}

/// Append the response steps returning `source` as `shape`
///
/// Wrapped resources build a wrapper and set its content with the overload
/// matching the shape; unwrapped ones return `source` as is.
pub fn respond_with(
    config: &ResourceConfiguration,
    shape: ResponseShape,
    source: &str,
    body: &mut Vec<BodyStep>,
) -> ResponseContract {
    match (config.is_wrapped(), shape.content_kind()) {
        (true, Some(content)) => {
            body.push(BodyStep::WrapContent {
                source: source.to_string(),
                content,
                into: WRAPPED.to_string(),
            });
            body.push(BodyStep::Return {
                source: WRAPPED.to_string(),
            });
        }
        (false, Some(_)) => body.push(BodyStep::Return {
            source: source.to_string(),
        }),
        (_, None) => return respond_no_content(config, body),
    }
    contract_for(config, shape)
}

/// Append the response steps of a no-content operation
pub fn respond_no_content(config: &ResourceConfiguration, body: &mut Vec<BodyStep>) -> ResponseContract {
    if config.is_wrapped() {
        body.push(BodyStep::WrapNoContent {
            into: WRAPPED.to_string(),
        });
        body.push(BodyStep::Return {
            source: WRAPPED.to_string(),
        });
    } else {
        body.push(BodyStep::ReturnEmpty);
    }
    contract_for(config, ResponseShape::Empty)
}
