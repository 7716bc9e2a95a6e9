/// Метаданные UseCase (индекс, имя, отображаемое название)
pub trait UseCaseMetadata {
    fn usecase_index() -> &'static str;
    fn usecase_name() -> &'static str;
    fn display_name() -> &'static str;
    fn description() -> &'static str;
}
