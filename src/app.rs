use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};

use crate::codepush::docs;
use crate::codepush::entry::{self, EntryEdit, EntryFile};
use crate::codepush::native::{self, ANDROID_KEY_MARKER, BundlePatch, IOS_KEY_MARKER};
use crate::codepush::provision::{self, CodePushCli, Platform, Resolution};
use crate::model::config::AppConfig;
use crate::model::patch::PatchDirective;
use crate::model::project::Project;
use crate::step::Step;
use crate::toolbox::Toolbox;

const MANUAL_CLEANUP: &str = "One thing we can't do right now is removing the <key>CodePushDeploymentKey</key><string>...</string> from your Info.plist and the packages.add(new CodePush(\"...\", MainApplication.this, BuildConfig.DEBUG)); from your MainApplication.java. You will need to do that manually.";

/// Answers that would otherwise come from prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddOptions {
    pub readme: Option<bool>,
    pub skip_login: bool,
}

pub struct App {
    config: AppConfig,
    project: Project,
    toolbox: Toolbox,
    options: AddOptions,
    cloud_apps: Vec<(Platform, String)>,
}

impl App {
    pub fn new(config: AppConfig, project: Project, toolbox: Toolbox, options: AddOptions) -> Self {
        Self {
            config,
            project,
            toolbox,
            options,
            cloud_apps: Vec::new(),
        }
    }

    pub fn add(&mut self) -> Result<()> {
        for step in Step::ADD {
            self.update(step)?;
        }
        self.toolbox.print.success("CodePush is set up");
        Ok(())
    }

    pub fn remove(&mut self) -> Result<()> {
        for step in Step::REMOVE {
            self.update(step)?;
        }
        Ok(())
    }

    pub fn update(&mut self, step: Step) -> Result<()> {
        tracing::info!("step: {}", step.label());

        let result = match step {
            Step::InstallPackage => self.install_package(),
            Step::UninstallPackage => self.uninstall_package(),
            Step::InstallPods => self.install_pods(),
            Step::InstallProvisioningCli => self.install_provisioning_cli(),
            Step::UninstallProvisioningCli => self.uninstall_provisioning_cli(),
            Step::AppendDocumentation => self.append_documentation(),
            Step::PatchIos => self.patch_ios(),
            Step::PatchIosConfig => self.patch_ios_config(),
            Step::PatchAndroid => self.patch_android(),
            Step::PatchAndroidResources => self.patch_android_resources(),
            Step::UnpatchIos => self.unpatch_ios(),
            Step::UnpatchAndroid => self.unpatch_android(),
            Step::UnpatchAndroidResources => self.unpatch_android_resources(),
            Step::ProvisionApps => self.provision_apps(),
            Step::InjectDeploymentKeys => self.inject_deployment_keys(),
            Step::WrapEntryFile => self.wrap_entry_file(),
            Step::UnwrapEntryFile => self.unwrap_entry_file(),
            Step::ReportManualCleanup => self.report_manual_cleanup(),
        };

        result.with_context(|| format!("{} failed", step.label()))
    }

    // ── Dependencies ─────────────────────────────────────────────────

    fn needs_link(&self) -> bool {
        self.project.react_native.0 < self.config.package.link_below
    }

    fn install_package(&mut self) -> Result<()> {
        let package = &self.config.package;
        self.toolbox
            .print
            .success(format!("Adding {}@{}", package.name, package.version));
        self.toolbox.packages.add_module(
            &self.project.root,
            &package.name,
            &package.version,
            self.needs_link(),
        )?;
        Ok(())
    }

    fn uninstall_package(&mut self) -> Result<()> {
        let package = &self.config.package;
        self.toolbox
            .print
            .warning(format!("Removing {}", package.name));
        self.toolbox
            .packages
            .remove_module(&self.project.root, &package.name, self.needs_link())?;
        Ok(())
    }

    fn install_pods(&mut self) -> Result<()> {
        self.toolbox.packages.install_pods(&self.project.ios_dir())?;
        Ok(())
    }

    fn install_provisioning_cli(&mut self) -> Result<()> {
        let package = &self.config.provisioning.global_package;
        self.toolbox.print.success(format!(
            "Adding global package ({package}) to setup code-push"
        ));
        self.toolbox.packages.add_global(package)?;
        Ok(())
    }

    fn uninstall_provisioning_cli(&mut self) -> Result<()> {
        let provisioning = &self.config.provisioning;
        if !provisioning.uninstall_cli_on_remove {
            tracing::debug!("leaving {} installed", provisioning.global_package);
            return Ok(());
        }
        self.toolbox
            .print
            .warning(format!("Removing global package ({})", provisioning.global_package));
        self.toolbox.packages.remove_global(&provisioning.global_package)?;
        Ok(())
    }

    // ── README ───────────────────────────────────────────────────────

    fn append_documentation(&mut self) -> Result<()> {
        let config = &self.config.documentation;
        let wanted = match self.options.readme {
            Some(answer) => answer,
            None if docs::is_automatic(&self.project, config) => true,
            None => {
                let choices = docs::CHOICES.map(String::from);
                self.toolbox.prompt.select(docs::PROMPT, &choices, 0)? == 1
            }
        };
        if !wanted {
            tracing::debug!("README left alone");
            return Ok(());
        }

        let readme = self.project.readme();
        if self.toolbox.filesystem.exists(&readme) {
            let current = self.toolbox.filesystem.read(&readme)?;
            if docs::already_documented(&current, config) {
                self.toolbox
                    .print
                    .warning("README.md already has a CodePush section, skipping");
                return Ok(());
            }
        }

        let section = docs::section(config)?;
        self.toolbox.patching.append(&readme, &section)?;
        self.toolbox.print.success("Added a CodePush section to README.md");
        Ok(())
    }

    // ── Native files ─────────────────────────────────────────────────

    fn bundle_patch(&self) -> BundlePatch {
        let bundle = BundlePatch::select(
            &self.project.react_native,
            &self.config.package.bundle_replacement_from,
        );
        tracing::debug!("react-native {} uses {bundle:?}", self.project.react_native);
        bundle
    }

    fn patch_all(&self, path: &Path, patches: &[PatchDirective]) -> Result<()> {
        for patch in patches {
            self.toolbox.patching.patch(path, patch)?;
        }
        Ok(())
    }

    fn patch_ios(&mut self) -> Result<()> {
        self.toolbox.print.success("Patching iOS files");
        let patches = native::app_delegate_patches(self.bundle_patch());
        self.patch_all(&self.project.app_delegate(), &patches)
    }

    fn patch_ios_config(&mut self) -> Result<()> {
        self.patch_all(&self.project.info_plist(), &[native::info_plist_patch()])
    }

    fn patch_android(&mut self) -> Result<()> {
        self.toolbox.print.success("Patching Android files");
        self.patch_all(
            &self.project.main_application(),
            &native::main_application_patches(),
        )
    }

    fn patch_android_resources(&mut self) -> Result<()> {
        self.patch_all(&self.project.strings_xml(), &[native::strings_xml_patch()])
    }

    fn unpatch_ios(&mut self) -> Result<()> {
        self.toolbox.print.warning("Patching iOS files");
        let patches = native::app_delegate_patches(self.bundle_patch());
        self.patch_all(&self.project.app_delegate(), &native::inverses(&patches))
    }

    fn unpatch_android(&mut self) -> Result<()> {
        self.toolbox.print.warning("Patching Android files");
        let patches = native::main_application_patches();
        self.patch_all(&self.project.main_application(), &native::inverses(&patches))
    }

    fn unpatch_android_resources(&mut self) -> Result<()> {
        let path = self.project.strings_xml();
        let content = self.toolbox.filesystem.read(&path)?;
        match native::strings_xml_removal(&content) {
            Some(removal) => self.patch_all(&path, &[removal]),
            None => {
                self.toolbox
                    .print
                    .warning("No CodePush deployment key in strings.xml, nothing to remove");
                Ok(())
            }
        }
    }

    // ── Cloud apps ───────────────────────────────────────────────────

    fn provision_apps(&mut self) -> Result<()> {
        let runner = Rc::clone(&self.toolbox.system);
        let provisioning = self.config.provisioning.clone();
        let cli = CodePushCli::new(runner.as_ref(), &provisioning.cli);

        self.toolbox.print.notice("Setting up code-push keys");
        if self.options.skip_login {
            tracing::info!("login skipped");
        } else {
            self.toolbox.print.notice("Logging in");
            // a saved session makes this failure harmless
            if let Err(err) = cli.login() {
                tracing::warn!("code-push login failed: {err}");
                self.toolbox.print.warning(err);
            }
        }

        self.toolbox.print.notice("Listing apps");
        let apps = cli.list_apps()?;
        tracing::info!("{} apps in account", apps.len());

        self.cloud_apps.clear();
        for platform in Platform::ALL {
            let name = match provision::resolve(&apps, platform, &self.project.name) {
                Resolution::Existing(name) => {
                    self.toolbox.print.notice(format!(
                        "Got {name} from account for {}",
                        platform.label()
                    ));
                    name
                }
                Resolution::Choose(names) => {
                    let message = format!("Which {} app do you want to work with?", platform.label());
                    let index = self.toolbox.prompt.select(&message, &names, 0)?;
                    names
                        .get(index)
                        .cloned()
                        .ok_or_else(|| anyhow!("no app at choice {index}"))?
                }
                Resolution::Create(name) => {
                    self.toolbox.print.notice(format!(
                        "No {} app found in account. Creating {name}",
                        platform.label()
                    ));
                    cli.add_app(&name, platform, &provisioning.framework)?;
                    name
                }
            };
            tracing::info!("{} app: {name}", platform.label());
            self.cloud_apps.push((platform, name));
        }
        Ok(())
    }

    fn cloud_app(&self, platform: Platform) -> Result<&str> {
        self.cloud_apps
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, name)| name.as_str())
            .ok_or_else(|| anyhow!("no {} app provisioned yet", platform.label()))
    }

    fn inject_deployment_keys(&mut self) -> Result<()> {
        let runner = Rc::clone(&self.toolbox.system);
        let provisioning = self.config.provisioning.clone();
        let cli = CodePushCli::new(runner.as_ref(), &provisioning.cli);

        self.toolbox.print.notice("Listing deployment keys");
        for platform in Platform::ALL {
            let (path, marker) = match platform {
                Platform::Ios => (self.project.info_plist(), IOS_KEY_MARKER),
                Platform::Android => (self.project.strings_xml(), ANDROID_KEY_MARKER),
            };
            let app = self.cloud_app(platform)?.to_string();

            let deployments = cli.list_deployments(&app)?;
            let key = provision::deployment_key(&deployments, &app, &provisioning.deployment)?;
            self.toolbox
                .patching
                .patch(&path, &native::key_injection(marker, key))?;

            self.toolbox.print.success(format!(
                "Using {} code-push key for {app} on {}",
                provisioning.deployment,
                platform.label()
            ));
        }
        Ok(())
    }

    // ── JS entry ─────────────────────────────────────────────────────

    fn locate_entry(&mut self) -> Option<EntryFile> {
        let found = EntryFile::locate(self.toolbox.filesystem.as_ref(), &self.project.root);
        if found.is_none() {
            self.toolbox
                .print
                .warning("Not sure what file to patch. Giving up.");
        }
        found
    }

    fn apply_entry_edits(&self, entry: &EntryFile, edits: &[EntryEdit]) -> Result<()> {
        for edit in edits {
            match edit {
                EntryEdit::Patch(patch) => self.toolbox.patching.patch(&entry.path, patch)?,
                EntryEdit::Append(text) => self.toolbox.patching.append(&entry.path, text)?,
            }
        }
        Ok(())
    }

    fn wrap_entry_file(&mut self) -> Result<()> {
        self.toolbox.print.info("Patching JS files");
        let Some(entry) = self.locate_entry() else {
            return Ok(());
        };

        let content = self.toolbox.filesystem.read(&entry.path)?;
        let edits = entry::plan_add(entry.kind, &content)
            .with_context(|| entry.path.display().to_string())?;
        self.apply_entry_edits(&entry, &edits)?;

        self.toolbox.print.success(format!(
            "Wrapped the default export of {} with codePush",
            entry.kind.relative_path()
        ));
        Ok(())
    }

    fn unwrap_entry_file(&mut self) -> Result<()> {
        self.toolbox.print.warning("Patching JS files");
        let Some(entry) = self.locate_entry() else {
            return Ok(());
        };

        let content = self.toolbox.filesystem.read(&entry.path)?;
        let edits = entry::plan_remove(entry.kind, &content)
            .with_context(|| entry.path.display().to_string())?;
        self.apply_entry_edits(&entry, &edits)
    }

    // ── Wrap-up ──────────────────────────────────────────────────────

    fn report_manual_cleanup(&mut self) -> Result<()> {
        self.toolbox.print.success("All files patched");
        self.toolbox.print.alert(MANUAL_CLEANUP);
        Ok(())
    }
}
