//! Native and React Native apps: copy the template, then install dependencies

use super::PreparedTemplate;
use crate::app::Os;
use crate::runtime::process::{self, CommandSpec};
use crate::templates::{copy_template, TokenValues};
use anyhow::Result;
use std::path::Path;

pub(super) async fn create_native(
    os: Os,
    prepared: &PreparedTemplate,
    project_dir: &Path,
    values: &TokenValues,
) -> Result<Vec<String>> {
    let files = copy_template(&prepared.template_dir, project_dir, &prepared.manifest, values)?;

    if os == Os::Ios {
        pod_install(project_dir).await?;
    }

    Ok(files)
}

pub(super) async fn create_react_native(
    os: Os,
    prepared: &PreparedTemplate,
    project_dir: &Path,
    values: &TokenValues,
) -> Result<Vec<String>> {
    let files = copy_template(&prepared.template_dir, project_dir, &prepared.manifest, values)?;

    if project_dir.join("package.json").exists() {
        process::run_throw_error(&CommandSpec::new("npm").arg("install").current_dir(project_dir))
            .await?;
    }

    if os == Os::Ios {
        pod_install(&project_dir.join(os.as_str())).await?;
    }

    Ok(files)
}

/// Run `pod install` where the template ships a Podfile
async fn pod_install(dir: &Path) -> Result<()> {
    if !dir.join("Podfile").exists() {
        return Ok(());
    }
    process::run_throw_error(&CommandSpec::new("pod").arg("install").current_dir(dir)).await
}
