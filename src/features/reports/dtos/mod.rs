mod report_dto;

pub use report_dto::{
    AttachmentResponseDto, CreateReportDto, CreateReportFormDto, CreateReportResponseDto,
    ListReportsResponseDto, ReportDetailResponseDto, ReportListQuery, ReportResponseDto,
    ReportSummaryDto, ReportWithCreatorDto,
};
