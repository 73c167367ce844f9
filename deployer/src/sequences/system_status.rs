use super::read_value;
use crate::deployer::Deployer;
use crate::error::{DeployerError, DeployerResult};

const SYSTEM_SUSPENSION: &str = "function systemSuspension() view returns (bool suspended, uint248 reason)";

/// Whether the whole system is suspended, as reported by `SystemStatus`.
///
/// Falls back to `configured` when the deployment has no `SystemStatus`.
pub async fn read_system_suspended(deployer: &Deployer<'_>, configured: bool) -> DeployerResult<bool> {
    let Some(system_status) = deployer.deployed("SystemStatus") else {
        return Ok(configured);
    };

    let value = read_value(deployer.client(), system_status, SYSTEM_SUSPENSION, &[]).await?;
    let suspended = value.as_bool().ok_or_else(|| DeployerError::UnexpectedValue {
        contract: system_status.name.clone(),
        function: "systemSuspension".to_string(),
        value: format!("{value:?}"),
    })?;
    log::info!("System suspended: {suspended}");
    Ok(suspended)
}
