//! 配置校验模块
//!
//! 校验规则：
//! - query_id 唯一
//! - 订阅名称非空
//! - file 订阅者必须提供 params.path
//! - 队列容量 > 0 (若设置)
//! - 数据源参数合法

use std::collections::HashSet;

use contracts::{ContractError, FeedConfig, StreamBlueprint, SubscriberType};

/// 校验 StreamBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &StreamBlueprint) -> Result<(), ContractError> {
    validate_queue(blueprint)?;
    validate_feed(blueprint)?;
    validate_query_ids(blueprint)?;
    validate_subscriptions(blueprint)?;
    Ok(())
}

/// 校验队列容量
fn validate_queue(blueprint: &StreamBlueprint) -> Result<(), ContractError> {
    if blueprint.queue.capacity == Some(0) {
        return Err(ContractError::config_validation(
            "queue.capacity",
            "capacity must be > 0 (omit it for an unbounded queue)",
        ));
    }
    Ok(())
}

/// 校验数据源
fn validate_feed(blueprint: &StreamBlueprint) -> Result<(), ContractError> {
    match &blueprint.feed {
        FeedConfig::Mock { query_ids, .. } => {
            if query_ids.is_empty() {
                return Err(ContractError::config_validation(
                    "feed.query_ids",
                    "mock feed needs at least one query_id",
                ));
            }
        }
        FeedConfig::Replay { path, .. } => {
            if path.as_os_str().is_empty() {
                return Err(ContractError::config_validation(
                    "feed.path",
                    "replay feed path cannot be empty",
                ));
            }
        }
    }
    Ok(())
}

/// 校验 query_id 唯一性
fn validate_query_ids(blueprint: &StreamBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for sub in &blueprint.subscriptions {
        if !seen.insert(sub.query_id) {
            return Err(ContractError::config_validation(
                format!("subscriptions[query_id={}]", sub.query_id),
                "duplicate query_id",
            ));
        }
    }
    Ok(())
}

/// 校验订阅配置
fn validate_subscriptions(blueprint: &StreamBlueprint) -> Result<(), ContractError> {
    for (idx, sub) in blueprint.subscriptions.iter().enumerate() {
        if sub.name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("subscriptions[{}].name", idx),
                "subscription name cannot be empty",
            ));
        }

        if sub.subscriber_type == SubscriberType::File
            && sub.params.get("path").is_none_or(|p| p.trim().is_empty())
        {
            return Err(ContractError::config_validation(
                format!("subscriptions[{}].params.path", idx),
                "file subscriber requires a non-empty 'path' param",
            ));
        }
    }
    Ok(())
}
