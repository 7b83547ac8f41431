//! Literal patches against the stock React Native iOS and Android templates.

use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

use crate::model::patch::PatchDirective;
use crate::model::project::NativeVersion;

pub const IOS_KEY_MARKER: &str = "ios-code-push-deployment-key";
pub const ANDROID_KEY_MARKER: &str = "android-code-push-deployment-key";

const APP_DELEGATE_IMPORT_ANCHOR: &str = r#"#import "AppDelegate.h""#;
const IOS_CODE_PUSH_IMPORT: &str = "\n#import <CodePush/CodePush.h>";
const IOS_RELEASE_BUNDLE: &str =
    r#"return [[NSBundle mainBundle] URLForResource:@"main" withExtension:@"jsbundle"];"#;
const IOS_CODE_PUSH_BUNDLE: &str = "return [CodePush bundleURL];";
const IOS_JS_CODE_LOCATION: &str = r#"jsCodeLocation = [[RCTBundleURLProvider sharedSettings] jsBundleURLForBundleRoot:@"index" fallbackResource:nil];"#;
const IOS_CODE_PUSH_LOCATION: &str = "\n  jsCodeLocation = [CodePush bundleURL];";

const INFO_PLIST_ANCHOR: &str = "<key>LSRequiresIPhoneOS</key>";

const ANDROID_CLASS_ANCHOR: &str =
    "public class MainApplication extends Application implements ReactApplication {";
const ANDROID_CODE_PUSH_IMPORT: &str = "import com.microsoft.codepush.react.CodePush;\n\n";
const ANDROID_MODULE_NAME_ANCHOR: &str = "protected String getJSMainModuleName";
const ANDROID_CODE_PUSH_BUNDLE: &str = "protected String getJSBundleFile() {\n          return CodePush.getJSBundleFile();\n        }\n\n        @Override\n        ";

const STRINGS_ANCHOR: &str = "</resources>";

static ANDROID_KEY_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*<string name="reactNativeCodePush_androidDeploymentKey">[^<]*</string>[ \t]*\r?\n?"#)
        .expect("valid android key entry regex")
});

/// How `AppDelegate.m` is pointed at the CodePush bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundlePatch {
    /// Newer templates: the release bundle URL is swapped for CodePush's.
    FullReplacement,
    /// Older templates: a CodePush `jsCodeLocation` line follows the packager one.
    AdjacentInsertion,
}

impl BundlePatch {
    pub fn select(react_native: &NativeVersion, replacement_from: &Version) -> Self {
        if react_native.0 >= *replacement_from {
            Self::FullReplacement
        } else {
            Self::AdjacentInsertion
        }
    }

    pub fn directive(self) -> PatchDirective {
        match self {
            Self::FullReplacement => PatchDirective::replace(IOS_RELEASE_BUNDLE, IOS_CODE_PUSH_BUNDLE),
            Self::AdjacentInsertion => {
                PatchDirective::insert_after(IOS_JS_CODE_LOCATION, IOS_CODE_PUSH_LOCATION)
            }
        }
    }
}

pub fn app_delegate_patches(bundle: BundlePatch) -> Vec<PatchDirective> {
    vec![
        PatchDirective::insert_after(APP_DELEGATE_IMPORT_ANCHOR, IOS_CODE_PUSH_IMPORT),
        bundle.directive(),
    ]
}

pub fn info_plist_patch() -> PatchDirective {
    PatchDirective::insert_before(
        INFO_PLIST_ANCHOR,
        format!("<key>CodePushDeploymentKey</key>\n\t<string>{IOS_KEY_MARKER}</string>\n\t"),
    )
}

pub fn main_application_patches() -> Vec<PatchDirective> {
    vec![
        PatchDirective::insert_before(ANDROID_CLASS_ANCHOR, ANDROID_CODE_PUSH_IMPORT),
        PatchDirective::insert_before(ANDROID_MODULE_NAME_ANCHOR, ANDROID_CODE_PUSH_BUNDLE),
    ]
}

pub fn strings_xml_patch() -> PatchDirective {
    PatchDirective::insert_before(
        STRINGS_ANCHOR,
        format!(
            "    <string name=\"reactNativeCodePush_androidDeploymentKey\">{ANDROID_KEY_MARKER}</string>\n"
        ),
    )
}

/// Swap a placeholder marker for the real deployment key.
pub fn key_injection(marker: &str, key: &str) -> PatchDirective {
    PatchDirective::replace(marker, key)
}

/// Undo a list of add-time patches, in the order they were applied.
pub fn inverses(patches: &[PatchDirective]) -> Vec<PatchDirective> {
    patches.iter().filter_map(PatchDirective::inverse).collect()
}

/// Delete the Android deployment key entry, whatever key it holds by now.
pub fn strings_xml_removal(content: &str) -> Option<PatchDirective> {
    ANDROID_KEY_ENTRY_RE
        .find(content)
        .map(|entry| PatchDirective::delete(entry.as_str()))
}
