pub const APP_NAME: &str = "recipe";

/// File name looked up when no recipe path is given.
pub const DEFAULT_RECIPE_FILE: &str = "recipe.lua";

/// Environment variable naming the default catalog directory.
pub const CATALOG_ENV: &str = "RECIPE_CATALOG";

/// Environment variable overriding the cmake executable.
pub const CMAKE_ENV: &str = "RECIPE_CMAKE";

/// Environment variable consulted for host compiler detection.
pub const COMPILER_ENV: &str = "CC";

/// Length of the truncated plan hash.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Name of the generated cmake toolchain file inside the generators folder.
pub const TOOLCHAIN_FILE_NAME: &str = "recipe_toolchain.cmake";

/// Name of the generated requirements file inside the generators folder.
pub const REQUIREMENTS_FILE_NAME: &str = "recipe_requirements.json";
