// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# {日本語|に|ほん|ご}の本\n\n今日は{漢字|かんじ}を{勉強|べん|きょう}します。\n\n- {東京|とう|きょう}\n- {大阪|おお|さか}\n\n```\n{日|ひ} stays raw\n```\n\nPlain paragraph without markup.\n\n";
    base.repeat(size)
}
