#![allow(dead_code)]

/// Two files, the first with two hunks.
pub const MULTI_FILE_DIFF: &str = r#"--- a/src/main.rs
+++ b/src/main.rs
@@ -1,5 +1,6 @@ fn main() {
 fn main() {
-    println!("Hello");
+    println!("Hello, world!");
+    println!("New line");
 }
@@ -20,3 +21,3 @@ fn helper() {
 fn helper() {
-    1
+    2
 }
--- /dev/null
+++ b/Cargo.toml
@@ -0,0 +1,3 @@
+[package]
+name = "test"
+version = "0.1.0"
"#;

pub const DELETED_FILE_DIFF: &str = r#"--- a/test.txt
+++ /dev/null
@@ -1 +0,0 @@
-test
"#;

/// Builds a diff with `hunks[i]` hunks for file `i`.
pub fn synthetic_diff(hunks: &[usize]) -> String {
  let mut text = String::new();
  for (file, count) in hunks.iter().enumerate() {
    text.push_str(&format!("--- a/file{file}.txt\n+++ b/file{file}.txt\n"));
    for hunk in 0..*count {
      let start = hunk * 10 + 1;
      text.push_str(&format!("@@ -{start},2 +{start},2 @@\n"));
      text.push_str(&format!(" keep {hunk}\n-old {hunk}\n+new {hunk}\n"));
    }
  }
  text
}
