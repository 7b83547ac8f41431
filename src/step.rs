/// Units of work that drive the installer, applied strictly in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    // -- Dependencies
    InstallPackage,
    UninstallPackage,
    InstallPods,
    InstallProvisioningCli,
    UninstallProvisioningCli,

    // -- README
    AppendDocumentation,

    // -- Native files
    PatchIos,
    PatchIosConfig,
    PatchAndroid,
    PatchAndroidResources,
    UnpatchIos,
    UnpatchAndroid,
    UnpatchAndroidResources,

    // -- Cloud apps
    ProvisionApps,
    InjectDeploymentKeys,

    // -- JS entry
    WrapEntryFile,
    UnwrapEntryFile,

    // -- Wrap-up
    ReportManualCleanup,
}

impl Step {
    pub const ADD: [Step; 11] = [
        Step::InstallPackage,
        Step::InstallPods,
        Step::InstallProvisioningCli,
        Step::AppendDocumentation,
        Step::PatchIos,
        Step::PatchIosConfig,
        Step::PatchAndroid,
        Step::PatchAndroidResources,
        Step::ProvisionApps,
        Step::InjectDeploymentKeys,
        Step::WrapEntryFile,
    ];

    pub const REMOVE: [Step; 8] = [
        Step::UninstallPackage,
        Step::InstallPods,
        Step::UninstallProvisioningCli,
        Step::UnpatchIos,
        Step::UnpatchAndroid,
        Step::UnpatchAndroidResources,
        Step::UnwrapEntryFile,
        Step::ReportManualCleanup,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Step::InstallPackage => "install package",
            Step::UninstallPackage => "uninstall package",
            Step::InstallPods => "pod install",
            Step::InstallProvisioningCli => "install code-push cli",
            Step::UninstallProvisioningCli => "uninstall code-push cli",
            Step::AppendDocumentation => "readme section",
            Step::PatchIos => "patch AppDelegate",
            Step::PatchIosConfig => "patch Info.plist",
            Step::PatchAndroid => "patch MainApplication",
            Step::PatchAndroidResources => "patch strings.xml",
            Step::UnpatchIos => "unpatch AppDelegate",
            Step::UnpatchAndroid => "unpatch MainApplication",
            Step::UnpatchAndroidResources => "unpatch strings.xml",
            Step::ProvisionApps => "provision apps",
            Step::InjectDeploymentKeys => "deployment keys",
            Step::WrapEntryFile => "wrap entry file",
            Step::UnwrapEntryFile => "unwrap entry file",
            Step::ReportManualCleanup => "manual cleanup",
        }
    }
}
