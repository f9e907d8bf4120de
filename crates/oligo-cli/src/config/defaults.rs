pub struct DefaultsConfig {
    pub check_reverse_complement: bool,
    pub verify: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            check_reverse_complement: true,
            verify: true,
        }
    }
}
