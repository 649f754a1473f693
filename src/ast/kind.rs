/// Discriminant selecting which of the AST's few generic field slots are
/// meaningful for a given node. Kept as one flat, closed enum rather than an
/// enum-of-variants-with-payloads so every node can live in the same
/// [`crate::arena::Arena`] slab and the intrusive sibling list stays
/// homogeneous; see the "Polymorphism across node kinds" design note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NodeKind {
    // ---- Statements ----
    SelectStmt,
    InsertStmt,
    UpdateStmt,
    DeleteStmt,
    CreateTableStmt,
    CreateIndexStmt,
    CreateViewStmt,
    CreateTriggerStmt,
    CreateSchemaStmt,
    AlterTableStmt,
    DropStmt,
    TruncateStmt,
    TransactionStmt,
    ValuesStmt,
    ExplainStmt,
    SetStmt,
    VacuumStmt,
    AnalyzeStmt,
    AttachStmt,
    DetachStmt,
    ReindexStmt,
    PragmaStmt,

    // ---- Set operations ----
    UnionStmt,

    // ---- Clauses ----
    WithClause,
    CteDefinition,
    SelectList,
    SelectItem,
    FromClause,
    WhereClause,
    GroupByClause,
    Cube,
    Rollup,
    GroupingSets,
    HavingClause,
    OrderByClause,
    OrderByItem,
    LimitClause,
    WindowClause,
    ReturningClause,
    OnConflictClause,
    UsingClause,
    AssignmentList,
    Assignment,

    // ---- References / table sources ----
    TableRef,
    JoinClause,
    ColumnRef,
    Star,
    Identifier,

    // ---- DDL components ----
    ColumnDef,
    ColumnConstraint,
    TableConstraint,
    DataType,
    IndexColumn,
    AlterAction,
    NameList,
    ColumnAliasList,

    // ---- Expressions ----
    BinaryExpr,
    UnaryExpr,
    ParenExpr,
    CaseExpr,
    WhenClause,
    CastExpr,
    ExtractExpr,
    ExistsExpr,
    InExpr,
    BetweenExpr,
    LikeExpr,
    IsNullExpr,
    IsDistinctFromExpr,
    FunctionCall,
    ArgumentList,
    FilterClause,
    ExprList,
    ArrayLiteral,
    RowLiteral,
    Subquery,

    // ---- Literals ----
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    BooleanLiteral,
    NullLiteral,
    DateTimeLiteral,
    IntervalLiteral,

    // ---- Window ----
    WindowSpec,
    WindowDef,
    PartitionByClause,
    FrameClause,
    FrameBound,
}

impl NodeKind {
    /// Whether this kind denotes a top-level statement (used by the script
    /// driver and the validator to recognize statement boundaries).
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::SelectStmt
                | NodeKind::InsertStmt
                | NodeKind::UpdateStmt
                | NodeKind::DeleteStmt
                | NodeKind::CreateTableStmt
                | NodeKind::CreateIndexStmt
                | NodeKind::CreateViewStmt
                | NodeKind::CreateTriggerStmt
                | NodeKind::CreateSchemaStmt
                | NodeKind::AlterTableStmt
                | NodeKind::DropStmt
                | NodeKind::TruncateStmt
                | NodeKind::TransactionStmt
                | NodeKind::ValuesStmt
                | NodeKind::ExplainStmt
                | NodeKind::SetStmt
                | NodeKind::VacuumStmt
                | NodeKind::AnalyzeStmt
                | NodeKind::AttachStmt
                | NodeKind::DetachStmt
                | NodeKind::ReindexStmt
                | NodeKind::PragmaStmt
                | NodeKind::UnionStmt
        )
    }

    /// Whether this kind is "select-shaped" for the purposes of set-operation
    /// arm validation (a bare SELECT, or another set operation, both count).
    pub fn is_select_shaped(self) -> bool {
        matches!(self, NodeKind::SelectStmt | NodeKind::UnionStmt | NodeKind::ValuesStmt)
    }

    /// Whether a node of this kind can be the callee target of an `OVER`
    /// clause (used by the validator to reject `OVER` on non-callable
    /// nodes).
    pub fn is_callable(self) -> bool {
        matches!(self, NodeKind::FunctionCall)
    }
}
