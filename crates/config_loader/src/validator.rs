//! 配置校验模块
//!
//! 校验规则：
//! - 引擎参数范围 (validator derive 规则)
//! - display.refresh_hz > 0，viewport / surface 尺寸 >= 0
//! - surface id 唯一，`root` 为保留 id
//! - parent 必须引用之前声明的 surface
//! - step 必须引用已声明的 surface
//! - at_ms >= 0 且单调不减
//! - run_until_ms 不早于最后一个 step

use std::collections::HashSet;

use contracts::{ContractError, EngineConfig, Scenario, ROOT_SURFACE};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// 校验引擎配置
pub fn validate_engine(config: &EngineConfig) -> Result<(), ContractError> {
    config
        .validate()
        .map_err(|errors| first_violation("engine", &errors))
}

/// 校验场景
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate_scenario(scenario: &Scenario) -> Result<(), ContractError> {
    validate_engine(&scenario.engine)?;
    validate_display(scenario)?;
    validate_surfaces(scenario)?;
    validate_steps(scenario)?;
    Ok(())
}

/// 将 validator 的嵌套错误展开为第一条 (字段路径, 信息)
fn first_violation(prefix: &str, errors: &ValidationErrors) -> ContractError {
    let mut found = None;
    collect_first(prefix, errors, &mut found);
    let (field, message) =
        found.unwrap_or_else(|| (prefix.to_string(), "invalid configuration".to_string()));
    ContractError::config_validation(field, message)
}

fn collect_first(path: &str, errors: &ValidationErrors, found: &mut Option<(String, String)>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (name, kind) in fields {
        if found.is_some() {
            return;
        }
        let field_path = if name == "__all__" {
            path.to_string()
        } else {
            format!("{path}.{name}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(error) = list.first() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", error.code));
                    *found = Some((field_path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_first(&field_path, inner, found),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_first(&format!("{field_path}[{index}]"), inner, found);
                }
            }
        }
    }
}

fn non_negative(field: String, value: f64) -> Result<(), ContractError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ContractError::config_validation(
            field,
            format!("must be a finite value >= 0, got {value}"),
        ))
    }
}

/// 校验显示与视口
fn validate_display(scenario: &Scenario) -> Result<(), ContractError> {
    let hz = scenario.display.refresh_hz;
    if !(hz.is_finite() && hz > 0.0) {
        return Err(ContractError::config_validation(
            "display.refresh_hz",
            format!("refresh_hz must be > 0, got {hz}"),
        ));
    }

    let viewport = &scenario.viewport;
    non_negative("viewport.width".into(), viewport.width)?;
    non_negative("viewport.height".into(), viewport.height)?;
    non_negative("viewport.content_width".into(), viewport.content_width)?;
    non_negative("viewport.content_height".into(), viewport.content_height)?;
    Ok(())
}

/// 校验 surface 拓扑
fn validate_surfaces(scenario: &Scenario) -> Result<(), ContractError> {
    let mut seen: HashSet<&str> = HashSet::new();

    for surface in &scenario.surfaces {
        let id = surface.id.as_str();
        if id.is_empty() {
            return Err(ContractError::config_validation(
                "surfaces[].id",
                "surface id cannot be empty",
            ));
        }
        if id == ROOT_SURFACE || id == "body" {
            return Err(ContractError::config_validation(
                format!("surfaces[id={id}]"),
                format!("'{id}' is a reserved surface id"),
            ));
        }
        if let Some(parent) = surface.parent.as_deref() {
            if parent != ROOT_SURFACE && !seen.contains(parent) {
                return Err(ContractError::config_validation(
                    format!("surfaces[id={id}].parent"),
                    format!("parent '{parent}' must be declared before '{id}'"),
                ));
            }
        }
        if !seen.insert(id) {
            return Err(ContractError::config_validation(
                format!("surfaces[id={id}]"),
                "duplicate surface id",
            ));
        }

        for (name, value) in [
            ("content_width", surface.content_width),
            ("content_height", surface.content_height),
            ("visible_width", surface.visible_width),
            ("visible_height", surface.visible_height),
        ] {
            non_negative(format!("surfaces[id={id}].{name}"), value)?;
        }
    }
    Ok(())
}

/// 校验输入脚本
fn validate_steps(scenario: &Scenario) -> Result<(), ContractError> {
    let declared: HashSet<&str> = scenario
        .surfaces
        .iter()
        .map(|s| s.id.as_str())
        .chain(std::iter::once(ROOT_SURFACE))
        .collect();

    let mut previous = 0.0;
    for (idx, step) in scenario.steps.iter().enumerate() {
        non_negative(format!("steps[{idx}].at_ms"), step.at_ms)?;
        if step.at_ms < previous {
            return Err(ContractError::config_validation(
                format!("steps[{idx}].at_ms"),
                format!(
                    "steps must be in time order: {} comes after {}",
                    step.at_ms, previous
                ),
            ));
        }
        previous = step.at_ms;

        if !declared.contains(step.target.as_str()) {
            return Err(ContractError::config_validation(
                format!("steps[{idx}].target"),
                format!("unknown surface '{}'", step.target),
            ));
        }
    }

    if let Some(until) = scenario.run_until_ms {
        if !until.is_finite() || until < previous {
            return Err(ContractError::config_validation(
                "run_until_ms",
                format!("run_until_ms ({until}) must not precede the last step ({previous})"),
            ));
        }
    }
    Ok(())
}
