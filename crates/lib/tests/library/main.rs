mod common;
mod lifecycle_tests;
mod lua_recipe_tests;
mod resolve_tests;
