//! Trimmed copies of the stock React Native templates.

use std::fs;
use std::path::Path;

pub const APP_DELEGATE_MODERN: &str = r#"#import "AppDelegate.h"

#import <React/RCTBridge.h>
#import <React/RCTBundleURLProvider.h>
#import <React/RCTRootView.h>

@implementation AppDelegate

- (BOOL)application:(UIApplication *)application didFinishLaunchingWithOptions:(NSDictionary *)launchOptions
{
  RCTBridge *bridge = [[RCTBridge alloc] initWithDelegate:self launchOptions:launchOptions];
  RCTRootView *rootView = [[RCTRootView alloc] initWithBridge:bridge
                                                   moduleName:@"Sample"
                                            initialProperties:nil];
  return YES;
}

- (NSURL *)sourceURLForBridge:(RCTBridge *)bridge
{
#if DEBUG
  return [[RCTBundleURLProvider sharedSettings] jsBundleURLForBundleRoot:@"index" fallbackResource:nil];
#else
  return [[NSBundle mainBundle] URLForResource:@"main" withExtension:@"jsbundle"];
#endif
}

@end
"#;

pub const APP_DELEGATE_LEGACY: &str = r#"#import "AppDelegate.h"

#import <React/RCTBundleURLProvider.h>
#import <React/RCTRootView.h>

@implementation AppDelegate

- (BOOL)application:(UIApplication *)application didFinishLaunchingWithOptions:(NSDictionary *)launchOptions
{
  NSURL *jsCodeLocation;

  jsCodeLocation = [[RCTBundleURLProvider sharedSettings] jsBundleURLForBundleRoot:@"index" fallbackResource:nil];

  RCTRootView *rootView = [[RCTRootView alloc] initWithBundleURL:jsCodeLocation
                                                      moduleName:@"Sample"
                                               initialProperties:nil
                                                   launchOptions:launchOptions];
  return YES;
}

@end
"#;

pub const INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleDisplayName</key>
	<string>Sample</string>
	<key>LSRequiresIPhoneOS</key>
	<true/>
</dict>
</plist>
"#;

pub const MAIN_APPLICATION: &str = r#"package com.sample;

import android.app.Application;
import com.facebook.react.PackageList;
import com.facebook.react.ReactApplication;
import com.facebook.react.ReactNativeHost;
import com.facebook.react.ReactPackage;
import java.util.List;

public class MainApplication extends Application implements ReactApplication {

  private final ReactNativeHost mReactNativeHost =
      new ReactNativeHost(this) {
        @Override
        public boolean getUseDeveloperSupport() {
          return BuildConfig.DEBUG;
        }

        @Override
        protected List<ReactPackage> getPackages() {
          return new PackageList(this).getPackages();
        }

        @Override
        protected String getJSMainModuleName() {
          return "index";
        }
      };
}
"#;

pub const STRINGS_XML: &str = r#"<resources>
    <string name="app_name">Sample</string>
</resources>
"#;

pub const APP_JS: &str = "import React from 'react';\nexport default App;\n";

/// Lay out a scaffolded project named `Sample` under `root`.
pub fn write_project(root: &Path, react_native: &str, boilerplate: Option<&str>) {
    let app_delegate = if react_native.starts_with("0.5") {
        APP_DELEGATE_LEGACY
    } else {
        APP_DELEGATE_MODERN
    };

    let files = [
        (
            "package.json".to_string(),
            format!(r#"{{"name":"Sample","dependencies":{{"react-native":"{react_native}"}}}}"#),
        ),
        (
            "ignite/ignite.json".to_string(),
            match boilerplate {
                Some(id) => format!(r#"{{"boilerplate":"{id}"}}"#),
                None => "{}".to_string(),
            },
        ),
        ("ios/Sample/AppDelegate.m".to_string(), app_delegate.to_string()),
        ("ios/Sample/Info.plist".to_string(), INFO_PLIST.to_string()),
        (
            "android/app/src/main/java/com/sample/MainApplication.java".to_string(),
            MAIN_APPLICATION.to_string(),
        ),
        (
            "android/app/src/main/res/values/strings.xml".to_string(),
            STRINGS_XML.to_string(),
        ),
        ("README.md".to_string(), "# Sample\n".to_string()),
    ];

    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}
