use std::path::PathBuf;

use super::Category;
use super::env::Environment;

/// One row of the catalog: where to look, and how deep to walk it
#[derive(Clone, Copy)]
pub struct TargetSpec {
    pub category: Category,
    pub resolve: fn(&dyn Environment) -> Vec<PathBuf>,
}

/// Browser vendors sharing the Chromium `User Data` layout
const CHROMIUM_VENDORS: &[&[&str]] = &[
    &["Google", "Chrome", "User Data"],
    &["Microsoft", "Edge", "User Data"],
    &["BraveSoftware", "Brave-Browser", "User Data"],
];

const CHROMIUM_CACHE_DIRS: &[&str] = &["Cache", "Code Cache", "Media Cache"];

/// The fixed catalog, in the order roots are scanned
pub const CATALOG: &[TargetSpec] = &[
    TargetSpec {
        category: Category::UpdateCache,
        resolve: update_cache,
    },
    TargetSpec {
        category: Category::PriorInstall,
        resolve: prior_install,
    },
    TargetSpec {
        category: Category::CrashDump,
        resolve: crash_dumps,
    },
    TargetSpec {
        category: Category::SystemLogs,
        resolve: system_logs,
    },
    TargetSpec {
        category: Category::InstallCache,
        resolve: install_cache,
    },
    TargetSpec {
        category: Category::SystemTemp,
        resolve: system_temp,
    },
    TargetSpec {
        category: Category::DeliveryOptimization,
        resolve: delivery_optimization,
    },
    TargetSpec {
        category: Category::BrowserCache,
        resolve: browser_caches,
    },
    TargetSpec {
        category: Category::BrowserProfile,
        resolve: browser_profiles,
    },
    TargetSpec {
        category: Category::TrashStore,
        resolve: trash_stores,
    },
    TargetSpec {
        category: Category::UserDownloads,
        resolve: user_downloads,
    },
    TargetSpec {
        category: Category::UserTemp,
        resolve: user_temp,
    },
];

fn nested(base: impl Into<PathBuf>, parts: &[&str]) -> PathBuf {
    let mut path = base.into();
    for part in parts {
        path.push(part);
    }
    path
}

fn system_root(env: &dyn Environment) -> Option<PathBuf> {
    env.var("SystemRoot")
        .or_else(|| env.var("WINDIR"))
        .map(PathBuf::from)
}

fn local_app_data(env: &dyn Environment) -> Option<PathBuf> {
    env.var("LOCALAPPDATA")
        .map(PathBuf::from)
        .or_else(|| user_profile(env).map(|p| nested(p, &["AppData", "Local"])))
}

fn user_profile(env: &dyn Environment) -> Option<PathBuf> {
    env.var("USERPROFILE").map(PathBuf::from)
}

fn under_system_root(env: &dyn Environment, parts: &[&[&str]]) -> Vec<PathBuf> {
    match system_root(env) {
        Some(root) => parts.iter().map(|p| nested(root.clone(), p)).collect(),
        None => Vec::new(),
    }
}

fn update_cache(env: &dyn Environment) -> Vec<PathBuf> {
    under_system_root(env, &[&["SoftwareDistribution", "Download"]])
}

/// `Windows.old` sits next to the system root on the same drive
fn prior_install(env: &dyn Environment) -> Vec<PathBuf> {
    system_root(env)
        .and_then(|root| root.parent().map(|drive| drive.join("Windows.old")))
        .into_iter()
        .collect()
}

fn crash_dumps(env: &dyn Environment) -> Vec<PathBuf> {
    under_system_root(env, &[&["Minidump"], &["MEMORY.DMP"]])
}

fn system_logs(env: &dyn Environment) -> Vec<PathBuf> {
    under_system_root(env, &[&["Logs"]])
}

fn install_cache(env: &dyn Environment) -> Vec<PathBuf> {
    under_system_root(env, &[&["Panther"]])
}

fn system_temp(env: &dyn Environment) -> Vec<PathBuf> {
    under_system_root(env, &[&["Temp"], &["Prefetch"]])
}

fn delivery_optimization(env: &dyn Environment) -> Vec<PathBuf> {
    under_system_root(
        env,
        &[&[
            "ServiceProfiles",
            "LocalService",
            "AppData",
            "Local",
            "Microsoft",
            "Windows",
            "DeliveryOptimization",
            "Cache",
        ]],
    )
}

fn browser_caches(env: &dyn Environment) -> Vec<PathBuf> {
    let Some(base) = local_app_data(env) else {
        return Vec::new();
    };

    CHROMIUM_VENDORS
        .iter()
        .flat_map(|vendor| {
            let profile = nested(nested(base.clone(), vendor), &["Default"]);
            CHROMIUM_CACHE_DIRS
                .iter()
                .map(move |dir| profile.join(dir))
        })
        .collect()
}

fn browser_profiles(env: &dyn Environment) -> Vec<PathBuf> {
    local_app_data(env)
        .map(|base| nested(base, &["Mozilla", "Firefox", "Profiles"]))
        .into_iter()
        .collect()
}

fn trash_stores(env: &dyn Environment) -> Vec<PathBuf> {
    env.volume_roots()
        .into_iter()
        .map(|volume| volume.join("$Recycle.Bin"))
        .collect()
}

fn user_downloads(env: &dyn Environment) -> Vec<PathBuf> {
    user_profile(env)
        .map(|p| p.join("Downloads"))
        .into_iter()
        .collect()
}

fn user_temp(env: &dyn Environment) -> Vec<PathBuf> {
    local_app_data(env)
        .map(|p| p.join("Temp"))
        .into_iter()
        .collect()
}
